//! Core error types for Cadence
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for Cadence
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// URI could not be parsed or has no scheme
    #[error("Invalid URI: {0}")]
    InvalidUri(String),
}
