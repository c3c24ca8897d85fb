//! Manifest reconciliation against blob storage.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use assetver_core::traits::probe::BlobProbe;
use assetver_entity::asset::Asset;
use assetver_entity::file::{FileVersion, ManifestEntry};

/// Annotates manifest entries with the current condition of their blobs.
#[derive(Debug, Clone)]
pub struct Reconciler {
    probe: Arc<dyn BlobProbe>,
}

impl Reconciler {
    /// Create a reconciler over the given probe.
    pub fn new(probe: Arc<dyn BlobProbe>) -> Self {
        Self { probe }
    }

    /// Build one [`FileVersion`] per manifest entry, in manifest order.
    ///
    /// A failed existence probe marks the file permanently deleted; a failed
    /// archive probe leaves it unarchived.
    pub async fn reconcile(&self, asset: &Asset, manifest: &[ManifestEntry]) -> Vec<FileVersion> {
        let files = join_all(manifest.iter().map(|entry| self.reconcile_entry(asset, entry))).await;
        debug!(
            asset_id = %asset.asset_id,
            files = files.len(),
            "Manifest reconciled"
        );
        files
    }

    async fn reconcile_entry(&self, asset: &Asset, entry: &ManifestEntry) -> FileVersion {
        let key = asset.object_key(&entry.relative_key);
        let mut file = FileVersion::from_manifest(entry);

        let (exists, latest_archived) = tokio::join!(
            self.probe.version_exists(&key, &entry.version_id),
            self.probe.latest_is_archived(&key),
        );

        file.is_permanently_deleted = match exists {
            Ok(exists) => !exists,
            Err(e) => {
                warn!(key = %key, version_id = %entry.version_id, error = %e, "Existence probe failed");
                true
            }
        };
        file.is_latest_version_archived = match latest_archived {
            Ok(archived) => archived,
            Err(e) => {
                warn!(key = %key, error = %e, "Archive probe failed");
                false
            }
        };
        file
    }
}
