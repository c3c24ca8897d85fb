//! Reconciled view of one asset version.

use serde::{Deserialize, Serialize};

use crate::file::{FileState, FileVersion};

/// The files of a selected version plus its descriptive metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionDetails {
    /// The asset the version belongs to.
    pub asset_id: String,
    /// Version identifier.
    pub version: String,
    /// Actor that created the version.
    pub created_by: String,
    /// When the version was recorded.
    pub date_created: String,
    /// Free-text comment.
    pub comment: Option<String>,
    /// Every file in the version's manifest, in manifest order.
    pub files: Vec<FileVersion>,
}

impl VersionDetails {
    /// Whether the version has no associated files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Count files by effective state.
    pub fn status_summary(&self) -> StatusSummary {
        StatusSummary::from_files(&self.files)
    }

    /// Find a file by its relative key.
    pub fn file(&self, relative_key: &str) -> Option<&FileVersion> {
        self.files.iter().find(|f| f.relative_key == relative_key)
    }
}

/// Per-state file counts for a version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    /// Files whose content is available.
    pub available: u64,
    /// Files whose latest content has been archived.
    pub archived: u64,
    /// Files whose content was irreversibly removed.
    pub permanently_deleted: u64,
}

impl StatusSummary {
    /// Count `files` by effective state.
    pub fn from_files(files: &[FileVersion]) -> Self {
        files
            .iter()
            .fold(Self::default(), |mut acc, f| {
                match f.effective_state() {
                    FileState::Available => acc.available += 1,
                    FileState::LatestArchived => acc.archived += 1,
                    FileState::PermanentlyDeleted => acc.permanently_deleted += 1,
                }
                acc
            })
    }

    /// Total number of files counted.
    pub fn total(&self) -> u64 {
        self.available + self.archived + self.permanently_deleted
    }
}
