//! Blob inventory trait used when recording new asset versions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// One concrete blob version as reported by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobObject {
    /// Full storage key.
    pub key: String,
    pub version_id: String,
    pub size: Option<u64>,
    /// RFC 3339 modification time.
    pub last_modified: Option<String>,
    pub etag: Option<String>,
    /// Whether the key's latest version is an archive marker.
    pub is_archived: bool,
}

/// Lists and restores blob versions. Keys are full storage keys.
#[async_trait]
pub trait BlobInventory: Send + Sync + std::fmt::Debug + 'static {
    /// Latest version of every non-archived key under `prefix`.
    async fn list_latest(&self, prefix: &str) -> AppResult<Vec<BlobObject>>;

    /// Metadata of one concrete version, or `None` when it was removed or
    /// is itself an archive marker.
    async fn head_version(&self, key: &str, version_id: &str) -> AppResult<Option<BlobObject>>;

    /// Copy `version_id` over the key so it becomes the latest version.
    /// Returns the id of the new version.
    async fn restore_version(&self, key: &str, version_id: &str) -> AppResult<String>;
}
