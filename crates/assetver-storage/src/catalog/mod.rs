//! JSON catalog: a file-backed metadata and execution store.

pub mod document;
pub mod status;
pub mod store;

pub use document::{CatalogDocument, ManifestRecord};
pub use status::RecordedStatusSource;
pub use store::CatalogStore;
