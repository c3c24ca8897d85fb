//! Manifest entries as recorded when an asset version is created.

use serde::{Deserialize, Serialize};

/// One file recorded in an asset version's manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    /// Path-like key, relative to the asset's base key.
    pub relative_key: String,
    /// Blob version the manifest pins.
    pub version_id: String,
    /// Size in bytes, if known.
    #[serde(default)]
    pub size: Option<u64>,
    /// Last-modified timestamp as recorded.
    #[serde(default)]
    pub last_modified: Option<String>,
    /// Entity tag of the blob.
    #[serde(default)]
    pub etag: Option<String>,
    /// Whether the blob was already archived when the version was recorded.
    #[serde(default)]
    pub is_archived: bool,
}
