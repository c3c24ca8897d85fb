//! Download progress entities.

pub mod progress;

pub use progress::{DownloadEvent, DownloadProgress, DownloadStatus, percent};
