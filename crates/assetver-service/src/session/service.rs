//! The version browsing session.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use assetver_core::config::pagination::PaginationConfig;
use assetver_core::error::AppError;
use assetver_core::result::AppResult;
use assetver_core::types::pagination::{PageRequest, PageResponse};
use assetver_entity::asset::{Asset, AssetRef};
use assetver_entity::download::DownloadProgress;
use assetver_entity::file::FileVersion;
use assetver_entity::version::{StatusSummary, VersionDetails, same_version};

use super::navigation::NavigationRequest;
use crate::download::{DownloadHandle, DownloadService};
use crate::file::{filter_files, paginate};
use crate::version::VersionCatalog;

/// Owns the selected version's files, the filter text, and the page
/// position for one asset.
///
/// Downloads started through the session are tied to its cancellation
/// token: selecting another version or dropping the session cancels them.
#[derive(Debug)]
pub struct VersionSession {
    asset: Asset,
    catalog: VersionCatalog,
    downloads: DownloadService,
    allowed_page_sizes: Vec<u64>,
    selected: Option<String>,
    details: Option<VersionDetails>,
    filter_text: String,
    page: u64,
    page_size: u64,
    cancel: CancellationToken,
}

impl VersionSession {
    /// Open a session for `asset`. No version is selected yet.
    pub async fn open(
        catalog: VersionCatalog,
        downloads: DownloadService,
        asset: &AssetRef,
        pagination: &PaginationConfig,
    ) -> AppResult<Self> {
        let asset = catalog.asset(asset).await?;
        Ok(Self {
            asset,
            catalog,
            downloads,
            allowed_page_sizes: pagination.allowed_page_sizes.clone(),
            selected: None,
            details: None,
            filter_text: String::new(),
            page: 1,
            page_size: pagination.default_page_size.max(1),
            cancel: CancellationToken::new(),
        })
    }

    /// The asset this session browses.
    pub fn asset(&self) -> &Asset {
        &self.asset
    }

    /// Select a version and load its files.
    ///
    /// A change of selection resets the filter and page, and cancels
    /// in-flight downloads, before the files are loaded. An unknown version
    /// leaves the session with no files and returns `NotFound`.
    pub async fn select_version(&mut self, version: &str) -> AppResult<&VersionDetails> {
        let unchanged = self
            .selected
            .as_deref()
            .is_some_and(|selected| same_version(selected, version));
        if !unchanged {
            self.filter_text.clear();
            self.page = 1;
            self.cancel.cancel();
            self.cancel = CancellationToken::new();
            self.downloads.tracker().clear();
            self.selected = Some(version.to_string());
            debug!(asset_id = %self.asset.asset_id, version, "Version selection changed");
        }

        self.details = None;
        let details = self
            .catalog
            .version_details(&self.asset.asset_ref(), version)
            .await?;
        Ok(self.details.insert(details))
    }

    /// Currently selected version id, as requested.
    pub fn selected_version(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Details of the selected version, if it loaded.
    pub fn details(&self) -> Option<&VersionDetails> {
        self.details.as_ref()
    }

    /// Current filter text.
    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    /// Replace the filter text; the page returns to 1.
    pub fn set_filter_text(&mut self, text: impl Into<String>) {
        self.filter_text = text.into();
        self.page = 1;
    }

    /// Requested page index (1-based). Out-of-range values are clamped when
    /// the page is rendered.
    pub fn set_page(&mut self, page: u64) {
        self.page = page.max(1);
    }

    /// Change the page size; the page returns to 1.
    pub fn set_page_size(&mut self, page_size: u64) -> AppResult<()> {
        if page_size == 0 {
            return Err(AppError::validation("Page size must be at least 1"));
        }
        if !self.allowed_page_sizes.is_empty() && !self.allowed_page_sizes.contains(&page_size) {
            return Err(AppError::validation(format!(
                "Page size {page_size} is not one of {:?}",
                self.allowed_page_sizes
            )));
        }
        self.page_size = page_size;
        self.page = 1;
        Ok(())
    }

    /// Current page size.
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Files of the selected version matching the filter.
    pub fn filtered_files(&self) -> Vec<FileVersion> {
        self.details
            .as_ref()
            .map(|d| filter_files(&d.files, &self.filter_text))
            .unwrap_or_default()
    }

    /// The visible page of filtered files.
    pub fn visible_page(&self) -> PageResponse<FileVersion> {
        let request = PageRequest {
            page: self.page,
            page_size: self.page_size,
        };
        paginate(&self.filtered_files(), request)
    }

    /// Per-state counts over all files of the selected version.
    pub fn status_summary(&self) -> StatusSummary {
        self.details
            .as_ref()
            .map(VersionDetails::status_summary)
            .unwrap_or_default()
    }

    fn file(&self, relative_key: &str) -> AppResult<&FileVersion> {
        let details = self
            .details
            .as_ref()
            .ok_or_else(|| AppError::validation("No version selected"))?;
        details
            .file(relative_key)
            .ok_or_else(|| AppError::not_found(format!("File {relative_key} not found in version")))
    }

    /// Navigation request for viewing a file. Permanently deleted files
    /// cannot be viewed.
    pub fn view_file(&self, relative_key: &str) -> AppResult<NavigationRequest> {
        let file = self.file(relative_key)?;
        let descriptor = file.descriptor().ok_or_else(|| {
            AppError::validation(format!(
                "File {relative_key} has been permanently deleted and cannot be viewed"
            ))
        })?;
        info!(asset_id = %self.asset.asset_id, relative_key, "View requested");
        Ok(NavigationRequest::for_file(&self.asset.asset_ref(), descriptor))
    }

    /// Start downloading a file of the selected version.
    pub fn download(&self, relative_key: &str) -> AppResult<DownloadHandle> {
        let file = self.file(relative_key)?;
        self.downloads.start(&self.asset, file, &self.cancel)
    }

    /// Progress of the latest download attempt for a file.
    pub fn download_progress(&self, relative_key: &str) -> Option<DownloadProgress> {
        self.downloads.tracker().get(relative_key)
    }

    /// Cancel in-flight downloads and end the session.
    pub fn close(self) {}
}

impl Drop for VersionSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
