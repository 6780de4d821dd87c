//! Error types for watchlist-core

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// A date string did not match any accepted precision
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// An entity record is internally inconsistent
    #[error("Invalid entity: {0}")]
    InvalidEntity(String),

    /// JSON parsing error (serde_json)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an invalid date error
    pub fn invalid_date(msg: impl Into<String>) -> Self {
        Error::InvalidDate(msg.into())
    }

    /// Create an invalid entity error
    pub fn invalid_entity(msg: impl Into<String>) -> Self {
        Error::InvalidEntity(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }
}
