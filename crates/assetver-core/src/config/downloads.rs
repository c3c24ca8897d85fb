//! Download transfer configuration.

use serde::{Deserialize, Serialize};

/// Settings for per-file downloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Directory where completed downloads are saved under the file's base name.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
    /// Maximum number of transfers running at once.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            request_timeout_seconds: default_timeout(),
            max_concurrent: default_max_concurrent(),
        }
    }
}

fn default_output_dir() -> String {
    "./downloads".to_string()
}

fn default_timeout() -> u64 {
    300
}

fn default_max_concurrent() -> usize {
    4
}
