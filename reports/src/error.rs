//! Error types for definition loading and report persistence.
//!
//! Failures propagate verbatim to the caller; nothing in this crate retries.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading definitions or writing reports.
#[derive(Debug, Error)]
pub enum StorageError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A definition path has an extension the loader does not handle.
    #[error("unsupported definition file: {0}")]
    UnsupportedFile(PathBuf),
}

/// Convenience alias for results with [`StorageError`].
pub type Result<T> = std::result::Result<T, StorageError>;
