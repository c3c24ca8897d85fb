//! File version domain entities.

pub mod descriptor;
pub mod manifest;
pub mod state;
pub mod version;

pub use descriptor::FileDescriptor;
pub use manifest::ManifestEntry;
pub use state::FileState;
pub use version::{FileVersion, base_name};
