//! Reference source errors

use crate::algorithms::CoordinateError;
use thiserror::Error;

/// Errors raised while fetching the center of array
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("key-value cache error")]
    Cache(#[from] redis::RedisError),
    #[error("field {field} missing from {key}")]
    MissingField { key: String, field: &'static str },
    #[error("field {field} is not a number: \"{value}\"")]
    InvalidValue { field: &'static str, value: String },
    #[error("invalid center of array")]
    OutOfRange(#[from] CoordinateError),
}

/// Result type for reference source operations
pub type ReferenceResult<T> = Result<T, ReferenceError>;
