//! Requests and results for recording new asset versions.

use serde::{Deserialize, Serialize};

use super::model::parse_version_number;

/// One explicitly chosen file version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSelection {
    pub relative_key: String,
    pub version_id: String,
    /// Accept the file even though its key is currently archived.
    #[serde(default)]
    pub is_archived: bool,
}

/// Record a new version from the latest blobs or from an explicit file list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVersionRequest {
    #[serde(default)]
    pub use_latest_files: bool,
    /// Ignored when `use_latest_files` is set.
    #[serde(default)]
    pub files: Vec<FileSelection>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Record a new version whose files are restored from an older one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevertVersionRequest {
    /// Version to restore, with or without the `v` prefix.
    #[serde(rename = "assetVersionId")]
    pub version: String,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionOperationKind {
    Create,
    Revert,
}

/// Outcome of a create or revert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionOperation {
    pub asset_id: String,
    /// The newly recorded version.
    #[serde(rename = "assetVersionId")]
    pub version: String,
    pub operation: VersionOperationKind,
    pub message: String,
    pub timestamp: String,
    pub file_count: usize,
    /// Relative keys left out because their blob was missing or archived.
    pub skipped_files: Vec<String>,
}

/// Id of the version after `current`. A missing or unparsable current id
/// counts as zero, so the first version is `"1"`.
pub fn next_version_id(current: Option<&str>) -> String {
    (current.map(parse_version_number).unwrap_or(0) + 1).to_string()
}
