//! Storage error types.
//!
//! These errors circulate between the codec, the version tracker, and the
//! engine. The engine's public API never propagates them: every failure is
//! logged and the operation degrades to defaults or a mismatch report.

use std::path::PathBuf;
use thiserror::Error;

/// Storage operation error.
#[derive(Debug, Error)]
pub enum StorageError {
    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Content is not well-formed JSON.
    #[error("Malformed JSON in {path}")]
    MalformedInput {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Well-formed JSON that does not fit the expected shape.
    #[error("JSON in {path} does not match the expected shape")]
    ShapeMismatch {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Serialization of an in-memory value failed.
    #[error("Failed to serialize value")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
