//! Metadata store trait: asset, version, and manifest records.

use async_trait::async_trait;

use assetver_core::result::AppResult;
use assetver_entity::asset::{Asset, AssetRef};
use assetver_entity::file::ManifestEntry;
use assetver_entity::version::AssetVersion;

/// Access to the asset metadata tables.
///
/// Lookups that find nothing return `Ok(None)`; `Err` is reserved for store
/// failures.
#[async_trait]
pub trait MetadataStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find an asset record.
    async fn find_asset(&self, asset: &AssetRef) -> AppResult<Option<Asset>>;

    /// All versions recorded for an asset, in storage order.
    async fn list_versions(&self, asset_id: &str) -> AppResult<Vec<AssetVersion>>;

    /// Find one version of an asset. `version` matches with or without the
    /// `v` prefix.
    async fn find_version(&self, asset_id: &str, version: &str) -> AppResult<Option<AssetVersion>>;

    /// The file manifest recorded for a version, or `None` when the version
    /// has no manifest.
    async fn find_manifest(
        &self,
        asset_id: &str,
        version: &str,
    ) -> AppResult<Option<Vec<ManifestEntry>>>;

    /// Record `version` with its manifest and make it the asset's current
    /// version; every other version of the asset stops being current.
    ///
    /// Fails with `NotFound` for an unknown asset and `Validation` when the
    /// version id is already taken.
    async fn record_version(
        &self,
        asset: &AssetRef,
        version: &AssetVersion,
        files: &[ManifestEntry],
    ) -> AppResult<()>;

    /// Number of files in a version's manifest; zero when it has none.
    async fn count_manifest(&self, asset_id: &str, version: &str) -> AppResult<u64> {
        Ok(self
            .find_manifest(asset_id, version)
            .await?
            .map(|files| files.len() as u64)
            .unwrap_or(0))
    }
}
