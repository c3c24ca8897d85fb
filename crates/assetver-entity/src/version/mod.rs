//! Asset version domain entities.

pub mod details;
pub mod model;
pub mod operation;
pub mod summary;

pub use details::{StatusSummary, VersionDetails};
pub use model::{AssetVersion, parse_version_number, same_version};
pub use operation::{
    CreateVersionRequest, FileSelection, RevertVersionRequest, VersionOperation,
    VersionOperationKind, next_version_id,
};
pub use summary::VersionSummary;
