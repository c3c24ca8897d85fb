//! Wires configuration into stores and services.

use std::sync::Arc;

use assetver_core::config::AppConfig;
use assetver_core::result::AppResult;
use assetver_entity::asset::AssetRef;
use assetver_service::{
    DownloadService, ExecutionService, Reconciler, VersionCatalog, VersionSession,
};
use assetver_storage::{CatalogStore, StorageManager};

/// Collaborators built once per CLI invocation.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: AppConfig,
    catalog: CatalogStore,
    storage: StorageManager,
}

impl AppContext {
    /// Validate configuration, open the catalog, and build storage.
    pub async fn build(config: AppConfig) -> AppResult<Self> {
        config.validate()?;
        let catalog = CatalogStore::open(&config.catalog.path, config.catalog.persist_updates).await?;
        let storage = StorageManager::from_config(&config).await?;
        Ok(Self {
            config,
            catalog,
            storage,
        })
    }

    /// Version listing and reconciliation.
    pub fn versions(&self) -> VersionCatalog {
        VersionCatalog::new(
            Arc::new(self.catalog.clone()),
            Reconciler::new(self.storage.probe.clone()),
            self.storage.inventory.clone(),
            self.config.pagination.max_version_items,
        )
    }

    /// Download service writing into `output_dir`, or the configured directory.
    pub fn downloads(&self, output_dir: Option<&str>) -> DownloadService {
        DownloadService::new(
            self.storage.storage.clone(),
            self.storage.fetcher.clone(),
            output_dir.unwrap_or(&self.config.downloads.output_dir),
            self.config.downloads.max_concurrent,
        )
    }

    /// Execution listing with live refresh from recorded snapshots.
    pub fn executions(&self) -> ExecutionService {
        ExecutionService::new(
            Arc::new(self.catalog.clone()),
            Arc::new(self.catalog.status_source()),
            self.config.pagination.execution_page_limit as usize,
        )
    }

    /// Open a browsing session for an asset.
    pub async fn session(
        &self,
        asset: &AssetRef,
        output_dir: Option<&str>,
    ) -> AppResult<VersionSession> {
        VersionSession::open(
            self.versions(),
            self.downloads(output_dir),
            asset,
            &self.config.pagination,
        )
        .await
    }
}
