//! Page size and list limit configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Page sizes for file tables and limits for version/execution listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size a new view session starts with.
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    /// Page sizes offered to the user.
    #[serde(default = "default_allowed_sizes")]
    pub allowed_page_sizes: Vec<u64>,
    /// Default and maximum number of versions per listing page.
    #[serde(default = "default_max_versions")]
    pub max_version_items: u64,
    /// Maximum number of workflow executions per listing.
    #[serde(default = "default_execution_limit")]
    pub execution_page_limit: u64,
}

impl PaginationConfig {
    /// Check that the default page size is one of the allowed sizes.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.default_page_size == 0 {
            return Err(AppError::configuration(
                "pagination.default_page_size must be at least 1",
            ));
        }
        if !self.allowed_page_sizes.is_empty()
            && !self.allowed_page_sizes.contains(&self.default_page_size)
        {
            return Err(AppError::configuration(format!(
                "pagination.default_page_size {} is not in allowed_page_sizes {:?}",
                self.default_page_size, self.allowed_page_sizes
            )));
        }
        Ok(())
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            allowed_page_sizes: default_allowed_sizes(),
            max_version_items: default_max_versions(),
            execution_page_limit: default_execution_limit(),
        }
    }
}

fn default_page_size() -> u64 {
    20
}

fn default_allowed_sizes() -> Vec<u64> {
    vec![10, 20, 50, 100]
}

fn default_max_versions() -> u64 {
    100
}

fn default_execution_limit() -> u64 {
    50
}
