//! Blob probe trait used to reconcile manifests against storage.

use async_trait::async_trait;

use crate::result::AppResult;

/// Answers existence and archival questions about versioned blobs.
///
/// Keys are full storage keys (asset prefix included).
#[async_trait]
pub trait BlobProbe: Send + Sync + std::fmt::Debug + 'static {
    /// Whether the given blob version still exists. Archive markers count as
    /// existing; only irreversibly removed versions return `false`.
    async fn version_exists(&self, key: &str, version_id: &str) -> AppResult<bool>;

    /// Whether the latest version stored under `key` is archived.
    async fn latest_is_archived(&self, key: &str) -> AppResult<bool>;
}
