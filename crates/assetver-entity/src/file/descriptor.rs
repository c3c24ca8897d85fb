//! Navigation descriptor for viewing a file.

use serde::{Deserialize, Serialize};

/// Read-only description of a file passed to the file viewer route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    /// Base name of the relative key.
    pub file_name: String,
    /// Relative key of the file.
    pub key: String,
    /// Always `false` for files listed in a version.
    pub is_directory: bool,
    /// Content blob the view should load.
    pub version_id: String,
    /// Size in bytes, if known.
    pub size: Option<u64>,
    /// Last-modified timestamp as recorded.
    pub last_modified: Option<String>,
    /// Whether this blob version is archived.
    pub is_archived: bool,
}

impl FileDescriptor {
    /// Lowercase extension of the file name, if any.
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit('.')
            .next()
            .filter(|ext| *ext != self.file_name)
            .map(|ext| ext.to_lowercase())
    }
}
