//! Convenience result type alias for Asset Versions.

use crate::error::AppError;

/// A specialized `Result` type for Asset Versions operations.
pub type AppResult<T> = Result<T, AppError>;
