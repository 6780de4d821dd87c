//! Protocol error types.
//!
//! [`ParamError`] carries the exact field that failed so callers see
//! messages like `reading vessel tonnage: invalid digit found in string`.
//! [`ErrorCode`] classifies failures for HTTP status mapping.

use serde::{Deserialize, Serialize};
use std::num::ParseIntError;
use thiserror::Error;

/// Classification of a failed request, mapped to an HTTP status by the
/// transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed query input (HTTP 400).
    InvalidRequest,
    /// The caller cancelled or the request timed out.
    Cancelled,
    /// Unexpected server-side failure (HTTP 500).
    Internal,
}

/// Malformed query parameter errors.
#[derive(Debug, Error)]
pub enum ParamError {
    #[error("reading vessel tonnage: {0}")]
    VesselTonnage(#[source] ParseIntError),

    #[error("reading vessel GrossRegisteredTonnage: {0}")]
    VesselGrossRegisteredTonnage(#[source] ParseIntError),

    #[error("reading {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

/// The JSON error envelope: `{"error": "<message>"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
