//! Error types for bb-core

use std::path::PathBuf;

/// Result type for bb-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in reconciliation operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An endpoint token could not be parsed or paired
    #[error("invalid endpoint {token:?}: {reason}")]
    InvalidEndpoint { token: String, reason: String },

    /// Sync was asked to push a folder into the store
    #[error("unsupported sync direction: {source_kind} -> {target_kind} (only id -> folder is supported)")]
    UnsupportedDirection {
        source_kind: &'static str,
        target_kind: &'static str,
    },

    /// Import refused before any write
    #[error(transparent)]
    Precondition(#[from] PreconditionViolation),

    /// A stickie insert failed after the import started writing
    #[error("insert stickie id={id} from {file}: {source}")]
    ImportInsert {
        id: String,
        file: String,
        #[source]
        source: bb_store::Error,
    },

    /// A record required by the operation does not exist
    #[error("{kind} not found: id={id}")]
    NotFound { kind: &'static str, id: String },

    /// Configuration file could not be loaded
    #[error("Configuration error in {path}: {message}")]
    Config { path: PathBuf, message: String },

    // Transparent wrappers for underlying crate errors
    /// Record store error from bb-store
    #[error(transparent)]
    Store(#[from] bb_store::Error),

    /// Filesystem error from bb-fs
    #[error(transparent)]
    Fs(#[from] bb_fs::Error),

    /// JSON rendering error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Import preconditions, each naming the offending file or id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionViolation {
    #[error("blackboard.yaml not found: {path}")]
    MissingBlackboardFile { path: String },

    #[error("blackboard id missing in {path}")]
    MissingBlackboardId { path: String },

    #[error("blackboard role missing in {path}")]
    MissingRole { path: String },

    #[error("blackboard already exists: id={id}")]
    BlackboardExists { id: String },

    #[error("found {} stickie yaml without id; import requires explicit ids: {}", files.len(), files.join(", "))]
    AnonymousStickies { files: Vec<String> },

    #[error("stickie already exists: id={id}")]
    StickieExists { id: String },

    #[error("stickie id={id} appears in more than one file: {}", files.join(", "))]
    DuplicateStickieId { id: String, files: Vec<String> },

    #[error("invalid record in {file}: {reason}")]
    InvalidRecord { file: String, reason: String },
}

impl Error {
    pub(crate) fn invalid_endpoint(token: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            token: token.into(),
            reason: reason.into(),
        }
    }
}
