//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every field carries a serde default so that an empty file
//! still yields a usable configuration.

pub mod catalog;
pub mod downloads;
pub mod logging;
pub mod pagination;
pub mod storage;

use serde::{Deserialize, Serialize};

use self::catalog::CatalogConfig;
use self::downloads::DownloadConfig;
use self::logging::LoggingConfig;
use self::pagination::PaginationConfig;
use self::storage::StorageConfig;

use crate::error::AppError;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "ASSETVER";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Metadata catalog settings.
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Asset blob storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Download transfer settings.
    #[serde(default)]
    pub downloads: DownloadConfig,
    /// Page sizes and list limits.
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the file at `path` with an optional `config/{env}` overlay and
    /// environment variables prefixed with `ASSETVER__`.
    pub fn load(path: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        self.pagination.validate()?;
        if self.downloads.max_concurrent == 0 {
            return Err(AppError::configuration(
                "downloads.max_concurrent must be at least 1",
            ));
        }
        match self.storage.provider.as_str() {
            "local" | "s3" => Ok(()),
            other => Err(AppError::configuration(format!(
                "Unknown storage provider '{other}'. Expected one of: local, s3"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.toml");
        std::fs::write(&path, "").unwrap();

        let config = AppConfig::load(path.to_str().unwrap(), "nonexistent-env").unwrap();
        assert_eq!(config.pagination.default_page_size, 20);
        assert_eq!(config.storage.provider, "local");
        assert_eq!(config.storage.url_expiry_seconds, 900);
        assert_eq!(config.logging.format, logging::LogFormat::Pretty);
    }

    #[test]
    fn test_sections_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[pagination]\ndefault_page_size = 50\n\n[downloads]\noutput_dir = \"/tmp/out\"\n",
        )
        .unwrap();

        let config = AppConfig::load(path.to_str().unwrap(), "nonexistent-env").unwrap();
        assert_eq!(config.pagination.default_page_size, 50);
        assert_eq!(config.downloads.output_dir, "/tmp/out");
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let mut config = AppConfig::default();
        config.storage.provider = "ftp".to_string();
        assert!(config.validate().is_err());
    }
}
