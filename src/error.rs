//! Error types for jsonkv
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for jsonkv operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Lifecycle Errors
    // -------------------------------------------------------------------------
    /// The storage directory or file could not be prepared; no handle exists.
    #[error("Cannot create storage: {0}")]
    Construction(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Lookup / Codec Errors
    // -------------------------------------------------------------------------
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Cannot decode value: {reason}")]
    Decode { reason: String },

    #[error("Cannot encode value: {0}")]
    Encoding(String),

    // -------------------------------------------------------------------------
    // Watcher Errors
    // -------------------------------------------------------------------------
    #[error("File watch error: {0}")]
    Watch(String),
}

impl StoreError {
    pub(crate) fn not_a_number() -> Self {
        StoreError::Decode {
            reason: "not a number".to_string(),
        }
    }

    pub(crate) fn invalid_json() -> Self {
        StoreError::Decode {
            reason: "invalid JSON".to_string(),
        }
    }

    /// Lookup misses are the only recoverable read failure callers usually branch on.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::KeyNotFound(_))
    }
}

impl From<notify::Error> for StoreError {
    fn from(err: notify::Error) -> Self {
        StoreError::Watch(err.to_string())
    }
}
