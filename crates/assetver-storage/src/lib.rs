//! # assetver-storage
//!
//! Collaborator implementations for Asset Versions: the JSON catalog metadata
//! store, blob providers (local filesystem, S3-compatible object stores), and
//! byte fetchers for retrieval URLs.

pub mod catalog;
pub mod fetch;
pub mod manager;
pub mod metadata;
pub mod providers;
pub mod workflow;

pub use catalog::{CatalogDocument, CatalogStore, RecordedStatusSource};
pub use manager::StorageManager;
pub use metadata::MetadataStore;
pub use workflow::{ExecutionStatusSource, ExecutionStore};
