//! Asset domain entities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies an asset within a database.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRef {
    /// Owning database.
    pub database_id: String,
    /// Asset identifier, unique within the database.
    pub asset_id: String,
}

impl AssetRef {
    /// Create a new asset reference.
    pub fn new(database_id: impl Into<String>, asset_id: impl Into<String>) -> Self {
        Self {
            database_id: database_id.into(),
            asset_id: asset_id.into(),
        }
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.database_id, self.asset_id)
    }
}

/// A logical collection of files plus metadata, tracked across versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Owning database.
    pub database_id: String,
    /// Asset identifier.
    pub asset_id: String,
    /// Display name.
    #[serde(default)]
    pub asset_name: String,
    /// Storage key prefix every relative file key is resolved against.
    pub base_key: String,
    /// Whether the asset's files may be downloaded. Absent means no.
    #[serde(default)]
    pub is_distributable: bool,
    /// The version currently marked as current, if any.
    #[serde(default)]
    pub current_version_id: Option<String>,
}

impl Asset {
    /// Reference to this asset.
    pub fn asset_ref(&self) -> AssetRef {
        AssetRef::new(&self.database_id, &self.asset_id)
    }

    /// Storage key of a manifest-relative file key.
    ///
    /// Manifest keys are always relative, so a key that happens to start
    /// with the base key text is still joined onto it.
    pub fn object_key(&self, relative_key: &str) -> String {
        join_key(&self.base_key, relative_key)
    }
}

/// Join two key segments with exactly one `/` between them.
pub fn join_key(base: &str, relative: &str) -> String {
    let base = base.trim_end_matches('/');
    let relative = relative.trim_start_matches('/');
    if base.is_empty() {
        relative.to_string()
    } else {
        format!("{base}/{relative}")
    }
}
