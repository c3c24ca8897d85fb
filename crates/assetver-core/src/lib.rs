//! # assetver-core
//!
//! Core crate for Asset Versions. Contains the collaborator traits for blob
//! storage and byte transfer, configuration schemas, pagination types, and
//! the unified error system.
//!
//! This crate has **no** internal dependencies on other Asset Versions crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
