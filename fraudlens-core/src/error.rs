//! Error types for fraudlens-core

use thiserror::Error;

/// Main error type for the fraudlens-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport or service failure talking to the backend
    #[error("gateway error: {0}")]
    Gateway(String),

    /// Lookup target does not exist on the backend
    #[error("not found: {0}")]
    NotFound(String),

    /// Backend answered with a payload that breaks the wire contract
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Video id is not part of the loaded video list
    #[error("video not found: {0}")]
    VideoNotFound(i64),

    /// Chart point index outside the loaded series
    #[error("point {index} out of range for series of length {len}")]
    PointOutOfRange { index: usize, len: usize },

    /// Operation needs a selection that has not been made yet
    #[error("no selection: {0}")]
    NoSelection(&'static str),

    /// Request task ended without producing a result
    #[error("request aborted")]
    Aborted,
}

impl Error {
    /// Whether this failure means the looked-up entity does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

/// Result type alias for fraudlens-core
pub type Result<T> = std::result::Result<T, Error>;
