//! Version catalog: lists an asset's versions, reconciles one version's
//! files, and records new versions.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use assetver_core::error::AppError;
use assetver_core::result::AppResult;
use assetver_core::traits::inventory::{BlobInventory, BlobObject};
use assetver_core::types::pagination::{TokenPage, TokenRequest};
use assetver_entity::asset::{Asset, AssetRef};
use assetver_entity::file::ManifestEntry;
use assetver_entity::version::{
    AssetVersion, CreateVersionRequest, FileSelection, RevertVersionRequest, VersionDetails,
    VersionOperation, VersionOperationKind, VersionSummary, next_version_id,
};
use assetver_storage::metadata::MetadataStore;

use crate::reconcile::Reconciler;

/// Reads versions from the metadata store and reconciles their manifests.
#[derive(Debug, Clone)]
pub struct VersionCatalog {
    metadata: Arc<dyn MetadataStore>,
    reconciler: Reconciler,
    inventory: Arc<dyn BlobInventory>,
    max_version_items: u64,
}

impl VersionCatalog {
    /// Create a catalog. `max_version_items` caps and defaults `max_items`.
    pub fn new(
        metadata: Arc<dyn MetadataStore>,
        reconciler: Reconciler,
        inventory: Arc<dyn BlobInventory>,
        max_version_items: u64,
    ) -> Self {
        Self {
            metadata,
            reconciler,
            inventory,
            max_version_items,
        }
    }

    /// Load an asset record.
    pub async fn asset(&self, asset: &AssetRef) -> AppResult<Asset> {
        self.metadata
            .find_asset(asset)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Asset {asset} not found")))
    }

    /// Versions of an asset, newest first, with manifest file counts.
    pub async fn list_versions(
        &self,
        asset: &AssetRef,
        request: &TokenRequest,
    ) -> AppResult<TokenPage<VersionSummary>> {
        self.asset(asset).await?;

        let mut versions = self.metadata.list_versions(&asset.asset_id).await?;
        versions.sort_by_key(|v| std::cmp::Reverse(v.version_number()));

        let mut rows = Vec::with_capacity(versions.len());
        for version in &versions {
            let count = self
                .metadata
                .count_manifest(&asset.asset_id, &version.version)
                .await?;
            rows.push(VersionSummary::from_version(version, count));
        }

        let page = TokenPage::from_vec(rows, request, self.max_version_items);
        debug!(
            asset = %asset,
            returned = page.items.len(),
            next_token = ?page.next_token,
            "Listed versions"
        );
        Ok(page)
    }

    /// Reconciled files and metadata of one version.
    ///
    /// Fails with `NotFound` when the asset or the version is unknown. A
    /// version without a manifest yields an empty file list.
    pub async fn version_details(&self, asset: &AssetRef, version: &str) -> AppResult<VersionDetails> {
        let record = self.asset(asset).await?;

        let found = self
            .metadata
            .find_version(&asset.asset_id, version)
            .await?
            .ok_or_else(|| AppError::not_found("Version not found"))?;

        let manifest = self
            .metadata
            .find_manifest(&asset.asset_id, &found.version)
            .await?
            .unwrap_or_default();
        let files = self.reconciler.reconcile(&record, &manifest).await;

        info!(
            asset = %asset,
            version = %found.version,
            files = files.len(),
            "Version details loaded"
        );

        Ok(VersionDetails {
            asset_id: found.asset_id,
            version: found.version,
            created_by: found.created_by,
            date_created: found.date_created,
            comment: found.comment,
            files,
        })
    }

    /// Record the next version of an asset and make it current.
    ///
    /// Files come from the latest non-archived blobs under the asset's base
    /// key, or from `request.files`. Explicit files whose version is gone, or
    /// whose key is archived without `is_archived` set, are skipped and
    /// reported. A version with no files is rejected.
    pub async fn create_version(
        &self,
        asset: &AssetRef,
        request: &CreateVersionRequest,
        created_by: &str,
    ) -> AppResult<VersionOperation> {
        let record = self.asset(asset).await?;
        let version = next_version_id(record.current_version_id.as_deref());

        let (files, skipped_files) = if request.use_latest_files {
            let prefix = record.object_key("");
            let latest = self.inventory.list_latest(&prefix).await?;
            let files = latest
                .into_iter()
                .map(|object| {
                    let relative_key = object
                        .key
                        .strip_prefix(&prefix)
                        .unwrap_or(&object.key)
                        .to_string();
                    manifest_entry(relative_key, object)
                })
                .collect();
            (files, Vec::new())
        } else {
            self.selected_files(&record, &request.files).await
        };

        if files.is_empty() {
            return Err(AppError::validation("No valid files found for versioning"));
        }

        let draft = VersionDraft {
            comment: request
                .comment
                .clone()
                .unwrap_or_else(|| format!("Version {version}")),
            message: format!(
                "Successfully created version {version} with {} files",
                files.len()
            ),
            operation: VersionOperationKind::Create,
            version,
            files,
            skipped_files,
        };
        self.record(asset, draft, created_by).await
    }

    /// Record the next version of an asset from the files of an older one.
    ///
    /// Each file's recorded blob version is restored as the key's latest
    /// version. Files whose blob version no longer exists are skipped; an
    /// empty result is still recorded.
    pub async fn revert_version(
        &self,
        asset: &AssetRef,
        request: &RevertVersionRequest,
        created_by: &str,
    ) -> AppResult<VersionOperation> {
        let record = self.asset(asset).await?;
        let target = self
            .metadata
            .find_version(&asset.asset_id, &request.version)
            .await?
            .ok_or_else(|| AppError::not_found("Version not found"))?;
        let manifest = self
            .metadata
            .find_manifest(&asset.asset_id, &target.version)
            .await?
            .unwrap_or_default();
        let version = next_version_id(record.current_version_id.as_deref());

        let restored = join_all(manifest.iter().map(|entry| self.restore_entry(&record, entry))).await;
        let mut files = Vec::new();
        let mut skipped_files = Vec::new();
        for (entry, result) in manifest.iter().zip(restored) {
            match result {
                Some(file) => files.push(file),
                None => skipped_files.push(entry.relative_key.clone()),
            }
        }

        let draft = VersionDraft {
            comment: request
                .comment
                .clone()
                .unwrap_or_else(|| format!("Reverted to version {}", request.version)),
            message: format!(
                "Successfully reverted to version {} with {} files",
                request.version,
                files.len()
            ),
            operation: VersionOperationKind::Revert,
            version,
            files,
            skipped_files,
        };
        self.record(asset, draft, created_by).await
    }

    async fn selected_files(
        &self,
        record: &Asset,
        selections: &[FileSelection],
    ) -> (Vec<ManifestEntry>, Vec<String>) {
        let heads = join_all(selections.iter().map(|selection| async move {
            let key = record.object_key(&selection.relative_key);
            match self.inventory.head_version(&key, &selection.version_id).await {
                Ok(head) => head,
                Err(e) => {
                    warn!(key = %key, version_id = %selection.version_id, error = %e, "File validation failed");
                    None
                }
            }
        }))
        .await;

        let mut files = Vec::new();
        let mut skipped = Vec::new();
        for (selection, head) in selections.iter().zip(heads) {
            match head {
                Some(object) if !object.is_archived || selection.is_archived => {
                    files.push(manifest_entry(selection.relative_key.clone(), object));
                }
                _ => skipped.push(selection.relative_key.clone()),
            }
        }
        (files, skipped)
    }

    async fn restore_entry(&self, record: &Asset, entry: &ManifestEntry) -> Option<ManifestEntry> {
        let key = record.object_key(&entry.relative_key);
        match self.inventory.head_version(&key, &entry.version_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %key, version_id = %entry.version_id, error = %e, "Existence check failed");
                return None;
            }
        }
        match self.inventory.restore_version(&key, &entry.version_id).await {
            Ok(version_id) => Some(ManifestEntry {
                relative_key: entry.relative_key.clone(),
                version_id,
                size: entry.size,
                last_modified: Some(chrono::Utc::now().to_rfc3339()),
                etag: entry.etag.clone(),
                is_archived: false,
            }),
            Err(e) => {
                warn!(key = %key, version_id = %entry.version_id, error = %e, "Restore failed");
                None
            }
        }
    }

    async fn record(
        &self,
        asset: &AssetRef,
        draft: VersionDraft,
        created_by: &str,
    ) -> AppResult<VersionOperation> {
        let timestamp = chrono::Utc::now().to_rfc3339();
        let recorded = AssetVersion {
            asset_id: asset.asset_id.clone(),
            version: draft.version.clone(),
            date_created: timestamp.clone(),
            comment: Some(draft.comment),
            description: None,
            created_by: created_by.to_string(),
            is_current: true,
        };
        self.metadata
            .record_version(asset, &recorded, &draft.files)
            .await?;

        info!(
            asset = %asset,
            version = %draft.version,
            files = draft.files.len(),
            skipped = draft.skipped_files.len(),
            operation = ?draft.operation,
            "Version recorded"
        );

        Ok(VersionOperation {
            asset_id: asset.asset_id.clone(),
            version: draft.version,
            operation: draft.operation,
            message: draft.message,
            timestamp,
            file_count: draft.files.len(),
            skipped_files: draft.skipped_files,
        })
    }
}

/// A version about to be recorded.
struct VersionDraft {
    version: String,
    comment: String,
    message: String,
    operation: VersionOperationKind,
    files: Vec<ManifestEntry>,
    skipped_files: Vec<String>,
}

fn manifest_entry(relative_key: String, object: BlobObject) -> ManifestEntry {
    ManifestEntry {
        relative_key,
        version_id: object.version_id,
        size: object.size,
        last_modified: object.last_modified,
        etag: object.etag,
        is_archived: object.is_archived,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetver_core::traits::probe::BlobProbe;
    use assetver_storage::catalog::{CatalogDocument, CatalogStore, ManifestRecord};
    use assetver_storage::providers::LocalBlobStore;
    use async_trait::async_trait;
    use bytes::Bytes;

    #[derive(Debug)]
    struct AllPresent;

    #[async_trait]
    impl BlobProbe for AllPresent {
        async fn version_exists(&self, _key: &str, _version_id: &str) -> AppResult<bool> {
            Ok(true)
        }

        async fn latest_is_archived(&self, _key: &str) -> AppResult<bool> {
            Ok(false)
        }
    }

    #[async_trait]
    impl BlobInventory for AllPresent {
        async fn list_latest(&self, _prefix: &str) -> AppResult<Vec<BlobObject>> {
            Ok(Vec::new())
        }

        async fn head_version(&self, _key: &str, _version_id: &str) -> AppResult<Option<BlobObject>> {
            Ok(None)
        }

        async fn restore_version(&self, key: &str, _version_id: &str) -> AppResult<String> {
            Err(AppError::internal(format!("read-only test store: {key}")))
        }
    }

    fn version(id: &str) -> AssetVersion {
        AssetVersion {
            asset_id: "a1".to_string(),
            version: id.to_string(),
            date_created: "2024-05-01T10:00:00Z".to_string(),
            comment: Some(format!("version {id}")),
            description: None,
            created_by: "alice".to_string(),
            is_current: id == "10",
        }
    }

    fn manifest(version: &str, count: usize) -> ManifestRecord {
        ManifestRecord {
            asset_id: "a1".to_string(),
            asset_version_id: version.to_string(),
            files: (0..count)
                .map(|i| ManifestEntry {
                    relative_key: format!("docs/file{i}.txt"),
                    version_id: format!("b{i}"),
                    size: Some(i as u64),
                    last_modified: None,
                    etag: None,
                    is_archived: false,
                })
                .collect(),
        }
    }

    fn document() -> CatalogDocument {
        CatalogDocument {
            assets: vec![Asset {
                database_id: "db1".to_string(),
                asset_id: "a1".to_string(),
                asset_name: "Turbine".to_string(),
                base_key: "a1".to_string(),
                is_distributable: true,
                current_version_id: Some("10".to_string()),
            }],
            versions: vec![version("1"), version("v2"), version("10"), version("3")],
            manifests: vec![manifest("1", 1), manifest("2", 3), manifest("10", 2)],
            ..Default::default()
        }
    }

    fn catalog(max: u64) -> VersionCatalog {
        let store = CatalogStore::from_document(document());
        VersionCatalog::new(
            Arc::new(store),
            Reconciler::new(Arc::new(AllPresent)),
            Arc::new(AllPresent),
            max,
        )
    }

    async fn tick() {
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }

    /// Catalog over a local blob tree holding a readme, a data file, and an
    /// archived model.
    async fn local_catalog() -> (tempfile::TempDir, LocalBlobStore, VersionCatalog) {
        let dir = tempfile::tempdir().unwrap();
        let blobs = LocalBlobStore::new(dir.path().to_str().unwrap(), 900)
            .await
            .unwrap();
        blobs
            .write_version("a1/docs/readme.txt", "r1", Bytes::from_static(b"one"))
            .await
            .unwrap();
        blobs
            .write_version("a1/data.csv", "d1", Bytes::from_static(b"x,y"))
            .await
            .unwrap();
        blobs
            .write_version("a1/model.glb", "g1", Bytes::from_static(b"glb"))
            .await
            .unwrap();
        tick().await;
        blobs.write_delete_marker("a1/model.glb", "dm1").await.unwrap();

        let store = Arc::new(blobs.clone());
        let catalog = VersionCatalog::new(
            Arc::new(CatalogStore::from_document(document())),
            Reconciler::new(store.clone()),
            store,
            100,
        );
        (dir, blobs, catalog)
    }

    #[tokio::test]
    async fn test_versions_sorted_numerically_with_counts() {
        let page = catalog(100)
            .list_versions(&AssetRef::new("db1", "a1"), &TokenRequest::default())
            .await
            .unwrap();
        let ids: Vec<_> = page.items.iter().map(|v| v.version.as_str()).collect();
        assert_eq!(ids, vec!["10", "3", "v2", "1"]);
        let counts: Vec<_> = page.items.iter().map(|v| v.file_count).collect();
        assert_eq!(counts, vec![2, 0, 3, 1]);
        assert!(page.next_token.is_none());
    }

    #[tokio::test]
    async fn test_versions_token_paging() {
        let catalog = catalog(100);
        let asset = AssetRef::new("db1", "a1");
        let first = catalog
            .list_versions(
                &asset,
                &TokenRequest {
                    starting_token: None,
                    max_items: Some(3),
                },
            )
            .await
            .unwrap();
        assert_eq!(first.items.len(), 3);
        let next = first.next_token.clone().unwrap();

        let second = catalog
            .list_versions(
                &asset,
                &TokenRequest {
                    starting_token: Some(next),
                    max_items: Some(3),
                },
            )
            .await
            .unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].version, "1");
        assert!(second.next_token.is_none());
    }

    #[tokio::test]
    async fn test_details_of_known_and_unknown_versions() {
        let catalog = catalog(100);
        let asset = AssetRef::new("db1", "a1");

        let details = catalog.version_details(&asset, "2").await.unwrap();
        assert_eq!(details.version, "v2");
        assert_eq!(details.created_by, "alice");
        assert_eq!(details.files.len(), 3);
        assert_eq!(details.files[0].relative_key, "docs/file0.txt");

        let empty = catalog.version_details(&asset, "3").await.unwrap();
        assert!(empty.is_empty());

        let err = catalog.version_details(&asset, "99").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.message, "Version not found");
    }

    #[tokio::test]
    async fn test_unknown_asset_is_not_found() {
        let err = catalog(100)
            .version_details(&AssetRef::new("db1", "nope"), "1")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_create_from_latest_files() {
        let (_dir, _blobs, catalog) = local_catalog().await;
        let asset = AssetRef::new("db1", "a1");
        let request = CreateVersionRequest {
            use_latest_files: true,
            ..Default::default()
        };

        let op = catalog.create_version(&asset, &request, "bob").await.unwrap();
        assert_eq!(op.version, "11");
        assert_eq!(op.operation, VersionOperationKind::Create);
        assert_eq!(op.file_count, 2);
        assert_eq!(op.message, "Successfully created version 11 with 2 files");
        assert!(op.skipped_files.is_empty());

        let details = catalog.version_details(&asset, "11").await.unwrap();
        let keys: Vec<_> = details.files.iter().map(|f| f.relative_key.as_str()).collect();
        assert_eq!(keys, vec!["data.csv", "docs/readme.txt"]);
        assert_eq!(details.created_by, "bob");
        assert_eq!(details.comment.as_deref(), Some("Version 11"));

        let page = catalog.list_versions(&asset, &TokenRequest::default()).await.unwrap();
        assert_eq!(page.items[0].version, "11");
        assert_eq!(catalog.asset(&asset).await.unwrap().current_version_id.as_deref(), Some("11"));
    }

    #[tokio::test]
    async fn test_create_from_selection_skips_invalid_files() {
        let (_dir, _blobs, catalog) = local_catalog().await;
        let asset = AssetRef::new("db1", "a1");
        let pick = |key: &str, version_id: &str, is_archived: bool| FileSelection {
            relative_key: key.to_string(),
            version_id: version_id.to_string(),
            is_archived,
        };
        let request = CreateVersionRequest {
            use_latest_files: false,
            files: vec![
                pick("docs/readme.txt", "r1", false),
                pick("model.glb", "g1", false),
                pick("missing.txt", "m1", false),
            ],
            comment: Some("pinned".to_string()),
        };

        let op = catalog.create_version(&asset, &request, "bob").await.unwrap();
        assert_eq!(op.file_count, 1);
        assert_eq!(op.skipped_files, vec!["model.glb", "missing.txt"]);

        let accepted = CreateVersionRequest {
            files: vec![pick("model.glb", "g1", true)],
            ..Default::default()
        };
        let op = catalog.create_version(&asset, &accepted, "bob").await.unwrap();
        assert_eq!(op.version, "12");
        assert_eq!(op.file_count, 1);

        let rejected = CreateVersionRequest {
            files: vec![pick("missing.txt", "m1", false)],
            ..Default::default()
        };
        let err = catalog.create_version(&asset, &rejected, "bob").await.unwrap_err();
        assert_eq!(err.message, "No valid files found for versioning");
        let page = catalog.list_versions(&asset, &TokenRequest::default()).await.unwrap();
        assert_eq!(page.items[0].version, "12");
    }

    #[tokio::test]
    async fn test_revert_restores_recorded_blobs() {
        let (_dir, blobs, catalog) = local_catalog().await;
        let asset = AssetRef::new("db1", "a1");
        let request = CreateVersionRequest {
            files: vec![FileSelection {
                relative_key: "docs/readme.txt".to_string(),
                version_id: "r1".to_string(),
                is_archived: false,
            }],
            ..Default::default()
        };
        catalog.create_version(&asset, &request, "bob").await.unwrap();

        tick().await;
        blobs
            .write_version("a1/docs/readme.txt", "r2", Bytes::from_static(b"two!"))
            .await
            .unwrap();
        tick().await;

        let op = catalog
            .revert_version(
                &asset,
                &RevertVersionRequest {
                    version: "v11".to_string(),
                    comment: None,
                },
                "carol",
            )
            .await
            .unwrap();
        assert_eq!(op.version, "12");
        assert_eq!(op.operation, VersionOperationKind::Revert);
        assert_eq!(op.message, "Successfully reverted to version v11 with 1 files");

        let details = catalog.version_details(&asset, "12").await.unwrap();
        assert_eq!(details.comment.as_deref(), Some("Reverted to version v11"));
        let restored = &details.files[0];
        assert_ne!(restored.version_id, "r1");
        let latest = blobs.list_latest("a1/docs").await.unwrap();
        assert_eq!(latest[0].version_id, restored.version_id);
        assert_eq!(latest[0].size, Some(3));
    }

    #[tokio::test]
    async fn test_revert_skips_missing_blobs_and_unknown_versions() {
        let (_dir, _blobs, catalog) = local_catalog().await;
        let asset = AssetRef::new("db1", "a1");

        // Version 2's manifest points at blobs that were never written.
        let op = catalog
            .revert_version(
                &asset,
                &RevertVersionRequest {
                    version: "2".to_string(),
                    comment: Some("back".to_string()),
                },
                "carol",
            )
            .await
            .unwrap();
        assert_eq!(op.file_count, 0);
        assert_eq!(op.skipped_files.len(), 3);
        assert!(catalog.version_details(&asset, "11").await.unwrap().is_empty());

        let err = catalog
            .revert_version(
                &asset,
                &RevertVersionRequest {
                    version: "99".to_string(),
                    comment: None,
                },
                "carol",
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
