//! Error types for bb-store

use std::path::PathBuf;

/// Result type for bb-store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to a record store
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Backend failure from SQLite
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A JSON-encoded column could not be read or written
    #[error("JSON column error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An id that is not a UUID
    #[error("Invalid id {id:?}: expected a UUID")]
    InvalidId { id: String },

    /// A required column was empty on insert
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    /// Insert collided with an existing record
    #[error("{kind} already exists: id={id}")]
    Duplicate { kind: &'static str, id: String },

    /// Stickie insert referenced a blackboard that does not exist
    #[error("Blackboard not found: id={id}")]
    UnknownBlackboard { id: String },

    /// A stored timestamp could not be parsed
    #[error("Invalid timestamp in {column}: {value:?}")]
    Timestamp { column: &'static str, value: String },

    #[error("Deadline exceeded")]
    DeadlineExceeded,

    #[error("Operation cancelled")]
    Cancelled,
}
