//! Version listing rows.

use serde::{Deserialize, Serialize};

use super::model::AssetVersion;

/// A version as shown in the version list, with its manifest file count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSummary {
    /// Version identifier.
    pub version: String,
    /// When the version was recorded.
    pub date_created: String,
    /// Free-text comment (empty when none).
    pub comment: String,
    /// Longer description (empty when none).
    pub description: String,
    /// Actor that created the version.
    pub created_by: String,
    /// Whether this is the asset's current version.
    pub is_current: bool,
    /// Number of files in the version's manifest.
    pub file_count: u64,
}

impl VersionSummary {
    /// Build a summary row from a version record and its manifest size.
    pub fn from_version(version: &AssetVersion, file_count: u64) -> Self {
        Self {
            version: version.version.clone(),
            date_created: version.date_created.clone(),
            comment: version.comment.clone().unwrap_or_default(),
            description: version.description.clone().unwrap_or_default(),
            created_by: version.created_by.clone(),
            is_current: version.is_current,
            file_count,
        }
    }
}
