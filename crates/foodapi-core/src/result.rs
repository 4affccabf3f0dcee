//! Convenience result type alias for the Food API.

use crate::error::AppError;

/// A specialized `Result` type for Food API operations.
pub type AppResult<T> = Result<T, AppError>;
