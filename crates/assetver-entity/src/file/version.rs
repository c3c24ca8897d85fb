//! File version projection.

use serde::{Deserialize, Serialize};

use super::descriptor::FileDescriptor;
use super::manifest::ManifestEntry;
use super::state::FileState;

/// A file as it existed within an asset version, annotated with the
/// current condition of its content blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileVersion {
    /// Path-like key, unique within the asset.
    pub relative_key: String,
    /// Content blob this record points to.
    pub version_id: String,
    /// Size in bytes, if known.
    #[serde(default)]
    pub size: Option<u64>,
    /// Last-modified timestamp as recorded.
    #[serde(default)]
    pub last_modified: Option<String>,
    /// Entity tag of the blob.
    #[serde(default)]
    pub etag: Option<String>,
    /// This specific blob version has been archived.
    #[serde(default)]
    pub is_archived: bool,
    /// The file's latest blob has been archived since this version was recorded.
    #[serde(default)]
    pub is_latest_version_archived: bool,
    /// The pinned blob was irreversibly removed.
    #[serde(default)]
    pub is_permanently_deleted: bool,
}

impl FileVersion {
    /// Build an unannotated record from a manifest entry.
    pub fn from_manifest(entry: &ManifestEntry) -> Self {
        Self {
            relative_key: entry.relative_key.clone(),
            version_id: entry.version_id.clone(),
            size: entry.size,
            last_modified: entry.last_modified.clone(),
            etag: entry.etag.clone(),
            is_archived: entry.is_archived,
            is_latest_version_archived: false,
            is_permanently_deleted: false,
        }
    }

    /// Effective display state.
    pub fn effective_state(&self) -> FileState {
        FileState::from_flags(self.is_permanently_deleted, self.is_latest_version_archived)
    }

    /// Whether view and download actions are enabled.
    pub fn actions_enabled(&self) -> bool {
        self.effective_state().allows_actions()
    }

    /// Last path segment of the relative key.
    pub fn file_name(&self) -> &str {
        base_name(&self.relative_key)
    }

    /// Read-only descriptor handed to the navigation boundary, or `None`
    /// when the content is gone.
    pub fn descriptor(&self) -> Option<FileDescriptor> {
        if !self.actions_enabled() {
            return None;
        }
        Some(FileDescriptor {
            file_name: self.file_name().to_string(),
            key: self.relative_key.clone(),
            is_directory: false,
            version_id: self.version_id.clone(),
            size: self.size,
            last_modified: self.last_modified.clone(),
            is_archived: self.is_archived,
        })
    }
}

/// Last `/`-separated segment of `key`; the whole key when that segment is empty.
pub fn base_name(key: &str) -> &str {
    match key.rsplit('/').next() {
        Some(name) if !name.is_empty() => name,
        _ => key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(key: &str) -> FileVersion {
        FileVersion::from_manifest(&ManifestEntry {
            relative_key: key.to_string(),
            version_id: "abc".to_string(),
            size: Some(10),
            last_modified: None,
            etag: None,
            is_archived: false,
        })
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("a/b/c.png"), "c.png");
        assert_eq!(base_name("c.png"), "c.png");
        assert_eq!(base_name("dir/"), "dir/");
    }

    #[test]
    fn test_descriptor_for_available_file() {
        let f = file("models/chair.glb");
        let d = f.descriptor().unwrap();
        assert_eq!(d.file_name, "chair.glb");
        assert_eq!(d.key, "models/chair.glb");
        assert_eq!(d.version_id, "abc");
        assert!(!d.is_directory);
    }

    #[test]
    fn test_no_descriptor_for_deleted_file() {
        let mut f = file("models/chair.glb");
        f.is_permanently_deleted = true;
        f.is_latest_version_archived = true;
        assert!(f.descriptor().is_none());
        assert_eq!(f.effective_state(), FileState::PermanentlyDeleted);
    }

    #[test]
    fn test_archived_file_still_viewable() {
        let mut f = file("models/chair.glb");
        f.is_latest_version_archived = true;
        assert!(f.descriptor().is_some());
        assert_eq!(f.effective_state(), FileState::LatestArchived);
    }
}
