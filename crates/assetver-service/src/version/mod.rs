//! Version listing and per-version details.

pub mod catalog;

pub use catalog::VersionCatalog;
