//! Error types for watchlist-ingest

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, IngestError>;

/// Ingest error type
#[derive(Error, Debug)]
pub enum IngestError {
    /// The configured data directory is missing or unreadable
    #[error("data directory {path}: {message}")]
    DataDirectory { path: String, message: String },

    /// Reading a list file failed
    #[error("reading {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Decoding a list file failed
    #[error("decoding {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
