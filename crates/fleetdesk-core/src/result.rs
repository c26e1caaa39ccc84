//! Application-wide result alias.

use crate::error::AppError;

/// Result type used throughout the application.
pub type AppResult<T> = Result<T, AppError>;
