//! Error types for the lens library.

use thiserror::Error;

/// All errors produced by the lens library.
#[derive(Error, Debug)]
pub enum LensError {
    /// Invalid query or layout parameters. Raised before any corpus scan.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Frequency tables or window index were built from a different token
    /// sequence (other content, or the same tokens in another order).
    #[error("Snapshot mismatch: index built from a different sequence of {tables} tokens than the {tokens} passed in")]
    SnapshotMismatch { tables: usize, tokens: usize },

    /// Token data rejected by the loader.
    #[error("Corpus error: {0}")]
    Corpus(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
}

impl LensError {
    /// Shorthand for a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Whether this error comes from invalid parameters.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

pub type LensResult<T> = Result<T, LensError>;
