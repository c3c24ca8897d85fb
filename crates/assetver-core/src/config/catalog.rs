//! Metadata catalog configuration.

use serde::{Deserialize, Serialize};

/// Location of the JSON metadata catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path to the catalog document.
    #[serde(default = "default_path")]
    pub path: String,
    /// Whether refreshed workflow executions are written back to the catalog file.
    #[serde(default = "default_true")]
    pub persist_updates: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            persist_updates: default_true(),
        }
    }
}

fn default_path() -> String {
    "./data/catalog.json".to_string()
}

fn default_true() -> bool {
    true
}
