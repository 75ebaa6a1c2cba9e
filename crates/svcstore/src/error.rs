//! Error types for svcstore

use std::io;
use thiserror::Error;

/// Result type alias for svcstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for catalog loading and component construction
#[derive(Debug, Error)]
pub enum Error {
    /// Construction-time misuse (zero capacity, missing required column)
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed tabular catalog
    #[error("Parse error: {0}")]
    Parse(String),

    /// Malformed JSON catalog
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidConfiguration(msg.into())
    }
}

impl From<nom::Err<nom::error::Error<&str>>> for Error {
    fn from(err: nom::Err<nom::error::Error<&str>>) -> Self {
        Error::Parse(format!("{:?}", err))
    }
}
