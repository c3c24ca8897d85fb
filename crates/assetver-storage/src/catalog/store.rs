//! File-backed catalog store.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};

use assetver_core::error::{AppError, ErrorKind};
use assetver_core::result::AppResult;
use assetver_entity::asset::{Asset, AssetRef};
use assetver_entity::file::ManifestEntry;
use assetver_entity::version::{AssetVersion, same_version};
use assetver_entity::workflow::{ExecutionRecord, WorkflowRef};

use super::document::{CatalogDocument, ManifestRecord};
use super::status::RecordedStatusSource;
use crate::metadata::MetadataStore;
use crate::workflow::ExecutionStore;

/// Metadata and execution store backed by a single JSON document.
///
/// The document is loaded once; recorded versions and execution updates are
/// written back with a temp-file rename when persistence is enabled.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    document: Arc<RwLock<CatalogDocument>>,
    path: Option<PathBuf>,
    persist_updates: bool,
}

impl CatalogStore {
    /// Load the catalog at `path`.
    pub async fn open(path: impl AsRef<Path>, persist_updates: bool) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        let text = fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Catalog not found: {}", path.display()))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read catalog: {}", path.display()),
                    e,
                )
            }
        })?;
        let document = CatalogDocument::from_json(&text)?;

        info!(
            path = %path.display(),
            assets = document.assets.len(),
            versions = document.versions.len(),
            executions = document.executions.len(),
            "Catalog loaded"
        );

        Ok(Self {
            document: Arc::new(RwLock::new(document)),
            path: Some(path),
            persist_updates,
        })
    }

    /// An in-memory catalog that is never written to disk.
    pub fn from_document(document: CatalogDocument) -> Self {
        Self {
            document: Arc::new(RwLock::new(document)),
            path: None,
            persist_updates: false,
        }
    }

    /// A status source answering from the snapshots recorded in this catalog.
    pub fn status_source(&self) -> RecordedStatusSource {
        RecordedStatusSource::new(Arc::clone(&self.document))
    }

    /// A copy of the current document.
    pub async fn snapshot(&self) -> CatalogDocument {
        self.document.read().await.clone()
    }

    async fn persist(&self, document: &CatalogDocument) -> AppResult<()> {
        let Some(path) = self.path.as_ref().filter(|_| self.persist_updates) else {
            return Ok(());
        };

        let text = document.to_json()?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, text.as_bytes()).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write catalog: {}", tmp.display()),
                e,
            )
        })?;
        fs::rename(&tmp, path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to replace catalog: {}", path.display()),
                e,
            )
        })?;

        debug!(path = %path.display(), "Catalog written");
        Ok(())
    }
}

fn same_asset(record: &ExecutionRecord, asset: &AssetRef) -> bool {
    record.database_id == asset.database_id && record.asset_id == asset.asset_id
}

#[async_trait]
impl MetadataStore for CatalogStore {
    async fn find_asset(&self, asset: &AssetRef) -> AppResult<Option<Asset>> {
        let doc = self.document.read().await;
        Ok(doc
            .assets
            .iter()
            .find(|a| a.database_id == asset.database_id && a.asset_id == asset.asset_id)
            .cloned())
    }

    async fn list_versions(&self, asset_id: &str) -> AppResult<Vec<AssetVersion>> {
        let doc = self.document.read().await;
        Ok(doc
            .versions
            .iter()
            .filter(|v| v.asset_id == asset_id)
            .cloned()
            .collect())
    }

    async fn find_version(&self, asset_id: &str, version: &str) -> AppResult<Option<AssetVersion>> {
        let doc = self.document.read().await;
        Ok(doc
            .versions
            .iter()
            .find(|v| v.asset_id == asset_id && v.matches(version))
            .cloned())
    }

    async fn find_manifest(
        &self,
        asset_id: &str,
        version: &str,
    ) -> AppResult<Option<Vec<ManifestEntry>>> {
        let doc = self.document.read().await;
        Ok(doc
            .manifests
            .iter()
            .find(|m| m.asset_id == asset_id && same_version(&m.asset_version_id, version))
            .map(|m| m.files.clone()))
    }

    async fn record_version(
        &self,
        asset: &AssetRef,
        version: &AssetVersion,
        files: &[ManifestEntry],
    ) -> AppResult<()> {
        let mut doc = self.document.write().await;
        let Some(index) = doc
            .assets
            .iter()
            .position(|a| a.database_id == asset.database_id && a.asset_id == asset.asset_id)
        else {
            return Err(AppError::not_found(format!("Asset {asset} not found")));
        };
        if doc
            .versions
            .iter()
            .any(|v| v.asset_id == asset.asset_id && v.matches(&version.version))
        {
            return Err(AppError::validation(format!(
                "Version {} already exists",
                version.version
            )));
        }

        for existing in doc.versions.iter_mut().filter(|v| v.asset_id == asset.asset_id) {
            existing.is_current = false;
        }
        doc.versions.push(AssetVersion {
            is_current: true,
            ..version.clone()
        });
        doc.manifests
            .retain(|m| !(m.asset_id == asset.asset_id && same_version(&m.asset_version_id, &version.version)));
        doc.manifests.push(ManifestRecord {
            asset_id: asset.asset_id.clone(),
            asset_version_id: version.version.clone(),
            files: files.to_vec(),
        });
        doc.assets[index].current_version_id = Some(version.version.clone());

        info!(
            asset = %asset,
            version = %version.version,
            files = files.len(),
            "Version recorded"
        );
        self.persist(&doc).await
    }
}

#[async_trait]
impl ExecutionStore for CatalogStore {
    async fn list_executions(
        &self,
        asset: &AssetRef,
        workflow: Option<&WorkflowRef>,
        limit: usize,
    ) -> AppResult<Vec<ExecutionRecord>> {
        let doc = self.document.read().await;
        Ok(doc
            .executions
            .iter()
            .rev()
            .filter(|r| same_asset(r, asset))
            .filter(|r| workflow.is_none_or(|w| r.workflow() == *w))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn save_execution(&self, record: &ExecutionRecord) -> AppResult<()> {
        let mut doc = self.document.write().await;
        let existing = doc.executions.iter_mut().find(|r| {
            r.database_id == record.database_id
                && r.asset_id == record.asset_id
                && r.execution_id == record.execution_id
        });
        match existing {
            Some(slot) => *slot = record.clone(),
            None => doc.executions.push(record.clone()),
        }

        debug!(
            asset_id = %record.asset_id,
            execution_id = %record.execution_id,
            status = %record.execution_status,
            "Execution saved"
        );
        self.persist(&doc).await
    }
}
