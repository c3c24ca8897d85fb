//! Asset storage trait: issues time-limited retrieval handles for blobs.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// What kind of object a retrieval handle is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DownloadType {
    /// A file belonging to an asset version.
    AssetFile,
    /// The generated preview image of an asset.
    AssetPreview,
}

impl DownloadType {
    /// Return the wire name of the download type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AssetFile => "assetFile",
            Self::AssetPreview => "assetPreview",
        }
    }
}

impl fmt::Display for DownloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parameters identifying a blob to retrieve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalRequest {
    /// Owning database.
    pub database_id: String,
    /// Owning asset.
    pub asset_id: String,
    /// Full storage key of the blob.
    pub key: String,
    /// Specific blob version, or the latest when absent.
    pub version_id: Option<String>,
    /// Requested object kind.
    pub download_type: DownloadType,
}

/// A time-limited URL for fetching a blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalHandle {
    /// URL the bytes can be fetched from.
    pub download_url: String,
    /// Seconds until the URL stops working.
    pub expires_in: u64,
    /// Blob version the URL points at.
    pub version_id: Option<String>,
    /// Object kind the URL was issued for.
    pub download_type: DownloadType,
}

/// Result of a retrieval-handle request that reached the storage service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrievalOutcome {
    /// The storage service issued a handle.
    Granted(RetrievalHandle),
    /// The storage service answered with an explicit failure indicator.
    Denied {
        /// Reason reported by the service.
        reason: String,
    },
}

/// Trait for services that hand out retrieval URLs for asset blobs.
///
/// An `Err` means the request itself failed (network, unexpected service
/// error); [`RetrievalOutcome::Denied`] means the service answered and refused.
#[async_trait]
pub trait AssetStorage: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "s3").
    fn provider_type(&self) -> &str;

    /// Request a time-limited retrieval handle for a blob.
    async fn retrieval_handle(&self, request: &RetrievalRequest) -> AppResult<RetrievalOutcome>;
}
