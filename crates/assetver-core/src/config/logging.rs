//! Diagnostic output settings for the CLI.

use serde::{Deserialize, Serialize};

/// How log lines are rendered on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event, for piping into collectors.
    Json,
    /// Multi-line human-readable output.
    #[default]
    Pretty,
}

/// `[logging]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Line rendering.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        // Progress goes to stdout; keep stderr quiet unless asked.
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
        }
    }
}
