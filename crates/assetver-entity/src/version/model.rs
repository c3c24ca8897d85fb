//! Asset version record.

use serde::{Deserialize, Serialize};

/// An immutable, numbered snapshot of an asset's file manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetVersion {
    /// The asset this version belongs to.
    pub asset_id: String,
    /// Version identifier, an integer optionally prefixed with `v`.
    #[serde(rename = "assetVersionId")]
    pub version: String,
    /// When the version was recorded, as stored.
    #[serde(default)]
    pub date_created: String,
    /// Free-text comment.
    #[serde(default)]
    pub comment: Option<String>,
    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// Actor that created the version.
    #[serde(default = "default_creator")]
    pub created_by: String,
    /// Whether this is the asset's current version.
    #[serde(default, rename = "isCurrentVersion")]
    pub is_current: bool,
}

impl AssetVersion {
    /// Numeric ordering key. A leading `v` is ignored; unparsable ids sort as zero.
    pub fn version_number(&self) -> u64 {
        parse_version_number(&self.version)
    }

    /// Whether `requested` names this version, with or without the `v` prefix.
    pub fn matches(&self, requested: &str) -> bool {
        same_version(&self.version, requested)
    }
}

/// Whether two version ids name the same version; `"v1"` and `"1"` do.
pub fn same_version(a: &str, b: &str) -> bool {
    a == b || (!a.is_empty() && !b.is_empty() && strip_prefix(a) == strip_prefix(b))
}

/// Parse `"v12"` or `"12"` into `12`.
pub fn parse_version_number(version: &str) -> u64 {
    strip_prefix(version).parse().unwrap_or(0)
}

fn strip_prefix(version: &str) -> &str {
    version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('V'))
        .unwrap_or(version)
}

fn default_creator() -> String {
    "system".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_number_ignores_prefix() {
        assert_eq!(parse_version_number("v12"), 12);
        assert_eq!(parse_version_number("7"), 7);
        assert_eq!(parse_version_number("draft"), 0);
    }

    #[test]
    fn test_same_version_ignores_prefix() {
        assert!(same_version("v1", "1"));
        assert!(same_version("V3", "v3"));
        assert!(!same_version("1", "11"));
        assert!(!same_version("", "v"));
    }

    #[test]
    fn test_deserialize_catalog_record() {
        let json = r#"{
            "assetId": "chair",
            "assetVersionId": "v2",
            "dateCreated": "2024-05-01T10:00:00",
            "comment": "new legs"
        }"#;
        let version: AssetVersion = serde_json::from_str(json).unwrap();
        assert_eq!(version.version, "v2");
        assert_eq!(version.created_by, "system");
        assert!(!version.is_current);
        assert!(version.matches("2"));
        assert!(version.matches("v2"));
        assert!(!version.matches("v3"));
    }
}
