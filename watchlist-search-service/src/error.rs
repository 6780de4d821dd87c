//! Service-level error types.
//!
//! These errors are internal to the service and are converted to the
//! protocol error envelope (and an HTTP status) by the transport layer.

use thiserror::Error;
use watchlist_search_protocol::ErrorCode;

/// Internal service errors.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The caller cancelled the search or its deadline passed.
    /// No partial results are returned.
    #[error("search cancelled")]
    Cancelled,

    /// Fetching raw list data failed. Non-fatal after startup: the
    /// previous index stays installed.
    #[error("refresh fetch failed: {message}")]
    RefreshFetch { message: String },

    /// Decoding raw list data failed. Non-fatal after startup.
    #[error("refresh parse failed: {message}")]
    RefreshParse { message: String },

    /// Unexpected failure.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl ServiceError {
    /// Convert to the protocol error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ServiceError::Cancelled => ErrorCode::Cancelled,
            ServiceError::RefreshFetch { .. }
            | ServiceError::RefreshParse { .. }
            | ServiceError::Internal { .. } => ErrorCode::Internal,
        }
    }
}

/// Result type alias for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
