//! Storage manager: builds the configured blob provider and fetcher.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use assetver_core::config::AppConfig;
use assetver_core::error::AppError;
use assetver_core::result::AppResult;
use assetver_core::traits::fetch::ByteFetcher;
use assetver_core::traits::inventory::BlobInventory;
use assetver_core::traits::probe::BlobProbe;
use assetver_core::traits::storage::AssetStorage;

use crate::fetch::{FileFetcher, HttpFetcher, RoutingFetcher};
use crate::providers::LocalBlobStore;

/// Holds the collaborators a session needs for blob access.
#[derive(Debug, Clone)]
pub struct StorageManager {
    /// Issues retrieval handles.
    pub storage: Arc<dyn AssetStorage>,
    /// Answers existence and archival questions.
    pub probe: Arc<dyn BlobProbe>,
    /// Lists and restores blob versions when recording asset versions.
    pub inventory: Arc<dyn BlobInventory>,
    /// Opens retrieval URLs.
    pub fetcher: Arc<dyn ByteFetcher>,
}

impl StorageManager {
    /// Build the provider named by `storage.provider`.
    pub async fn from_config(config: &AppConfig) -> AppResult<Self> {
        let fetcher = Arc::new(RoutingFetcher::new(
            HttpFetcher::new(Duration::from_secs(config.downloads.request_timeout_seconds))?,
            FileFetcher,
        ));

        let storage = &config.storage;
        let manager = match storage.provider.as_str() {
            "local" => {
                let store = Arc::new(
                    LocalBlobStore::new(&storage.local.root_path, storage.url_expiry_seconds)
                        .await?,
                );
                Self {
                    storage: store.clone(),
                    probe: store.clone(),
                    inventory: store,
                    fetcher,
                }
            }
            #[cfg(feature = "s3")]
            "s3" => {
                let store = Arc::new(
                    crate::providers::s3::S3BlobStore::new(&storage.s3, storage.url_expiry_seconds)
                        .await?,
                );
                Self {
                    storage: store.clone(),
                    probe: store.clone(),
                    inventory: store,
                    fetcher,
                }
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Storage provider '{other}' is not available in this build"
                )));
            }
        };

        info!(provider = manager.storage.provider_type(), "Storage initialized");
        Ok(manager)
    }
}
