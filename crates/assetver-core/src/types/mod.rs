//! Core type definitions used across the Asset Versions workspace.

pub mod pagination;

pub use pagination::{PageRequest, PageResponse, TokenPage, TokenRequest, page_count};
