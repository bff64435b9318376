//! Core error types for tadalist-core.
//!
//! The streak engine itself never fails; errors exist only at the storage
//! boundary and for store operations addressed at missing ids.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tadalist-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A group id did not match any group in the collection
    #[error("Group not found: {0}")]
    GroupNotFound(String),

    /// A task id did not match any task in the group
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to read a blob from the store
    #[error("Failed to read blob '{key}': {source}")]
    ReadFailed {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a blob to the store
    #[error("Failed to write blob to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or resolve the data directory
    #[error("Failed to prepare data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stored blob did not parse as the expected shape
    #[error("Stored data is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
