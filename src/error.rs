// Error types for todo operations and slot storage

use thiserror::Error;

pub type Result<T, E = TodoError> = std::result::Result<T, E>;

/// Failures surfaced to the caller of a store or codec operation
#[derive(Debug, Error)]
pub enum TodoError {
    /// Input rejected before any state change (e.g. an empty title)
    #[error("validation failed: {0}")]
    Validation(String),

    /// No todo with the given id
    #[error("todo with id {0} not found")]
    NotFound(String),

    /// Import text is not valid JSON
    #[error("failed to import todos: invalid JSON: {0}")]
    Format(#[source] serde_json::Error),

    /// Import JSON does not have the expected shape
    #[error("failed to import todos: {0}")]
    Schema(String),

    /// Import file could not be read
    #[error("failed to read import file: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of the local key-value storage
///
/// These are logged and recovered where they occur; they never abort an
/// in-memory mutation.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("slot {key} holds unparsable content: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid slot key: {0}")]
    InvalidKey(String),
}
