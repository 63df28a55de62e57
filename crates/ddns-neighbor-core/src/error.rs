//! Error types for the neighbor engine
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for neighbor engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the neighbor engine
#[derive(Error, Debug)]
pub enum Error {
    /// The neighbor-listing collaborator failed
    #[error("Neighbor collector error: {0}")]
    Collector(String),

    /// The collaborator answered, but with nothing usable
    #[error("Neighbor payload error: {0}")]
    Payload(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The collaborator did not answer in time
    #[error("Timed out: {0}")]
    Timeout(String),

    /// I/O errors (spawning the collaborator, reading its output)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a collector error
    pub fn collector(msg: impl Into<String>) -> Self {
        Self::Collector(msg.into())
    }

    /// Create a payload error
    pub fn payload(msg: impl Into<String>) -> Self {
        Self::Payload(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
