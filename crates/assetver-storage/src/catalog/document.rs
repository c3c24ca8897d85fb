//! On-disk layout of the catalog file.

use serde::{Deserialize, Serialize};

use assetver_entity::asset::Asset;
use assetver_entity::file::ManifestEntry;
use assetver_entity::version::AssetVersion;
use assetver_entity::workflow::{ExecutionRecord, ExecutionSnapshot};

/// Manifest of one asset version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestRecord {
    /// Asset the manifest belongs to.
    pub asset_id: String,
    /// Version the manifest was recorded for.
    pub asset_version_id: String,
    /// Files in the version.
    #[serde(default)]
    pub files: Vec<ManifestEntry>,
}

/// The whole catalog as stored in one JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDocument {
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub versions: Vec<AssetVersion>,
    #[serde(default)]
    pub manifests: Vec<ManifestRecord>,
    /// Execution records in insertion order.
    #[serde(default)]
    pub executions: Vec<ExecutionRecord>,
    /// Recorded live states, keyed by execution ARN.
    #[serde(default)]
    pub execution_snapshots: Vec<ExecutionSnapshot>,
}

impl CatalogDocument {
    /// Parse a catalog from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Render the catalog as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_parses() {
        let doc = CatalogDocument::from_json("{}").unwrap();
        assert_eq!(doc, CatalogDocument::default());
    }

    #[test]
    fn test_parses_wire_field_names() {
        let json = r#"{
            "assets": [{"databaseId": "db1", "assetId": "a1", "baseKey": "a1/"}],
            "versions": [{"assetId": "a1", "assetVersionId": "2", "dateCreated": "2024-01-02T03:04:05Z", "isCurrentVersion": true}],
            "manifests": [{"assetId": "a1", "assetVersionId": "2", "files": [{"relativeKey": "docs/a.txt", "versionId": "x1", "size": 10}]}],
            "executions": [{"databaseId": "db1", "assetId": "a1", "workflowDatabaseId": "db1", "workflowId": "w1", "workflow_arn": "arn:aws:states:us-east-1:1:stateMachine:wf", "executionId": "e1"}]
        }"#;
        let doc = CatalogDocument::from_json(json).unwrap();
        assert!(!doc.assets[0].is_distributable);
        assert_eq!(doc.versions[0].created_by, "system");
        assert!(doc.versions[0].is_current);
        assert_eq!(doc.manifests[0].files[0].size, Some(10));
        assert!(doc.executions[0].needs_refresh());
    }
}
