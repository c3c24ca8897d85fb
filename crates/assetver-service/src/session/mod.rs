//! Per-asset browsing session over one selected version.

pub mod navigation;
pub mod service;

pub use navigation::NavigationRequest;
pub use service::VersionSession;
