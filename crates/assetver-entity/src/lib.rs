//! # assetver-entity
//!
//! Domain entity models for Asset Versions. Catalog records (assets,
//! versions, manifests, workflow executions) serialize with the camelCase
//! field names used by the metadata store; projections such as
//! [`file::FileVersion`] and [`version::VersionDetails`] are built per request.

pub mod asset;
pub mod download;
pub mod file;
pub mod version;
pub mod viewer;
pub mod workflow;
