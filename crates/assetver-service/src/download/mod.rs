//! Per-file downloads with progress tracking.

pub mod service;
pub mod tracker;

pub use service::{DownloadHandle, DownloadService};
pub use tracker::DownloadTracker;
