//! # assetver-service
//!
//! Business logic for Asset Versions: reconciling manifests against blob
//! storage, the per-version browsing session (filter, paginate, view,
//! download), the download tracker, and workflow execution tracking.

pub mod download;
pub mod execution;
pub mod file;
pub mod reconcile;
pub mod session;
pub mod version;

pub use download::{DownloadService, DownloadTracker};
pub use execution::ExecutionService;
pub use reconcile::Reconciler;
pub use session::VersionSession;
pub use version::VersionCatalog;
