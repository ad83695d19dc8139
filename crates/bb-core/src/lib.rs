//! Blackboard reconciliation engine
//!
//! Reconciles a blackboard and its stickies held in a record store against a
//! local YAML mirror folder:
//!
//! - **diff**: classify every record as unchanged, changed, remote-only or
//!   local-only
//! - **sync**: project remote records into the folder, remote -> folder only
//! - **import**: create a new blackboard and stickies from a folder, keeping
//!   their ids
//!
//! # Architecture
//!
//! ```text
//!                 bb-cli
//!                    |
//!                 bb-core
//!                    |
//!          +---------+---------+
//!          |                   |
//!        bb-fs              bb-store
//! ```

pub mod compare;
pub mod config;
pub mod diff;
pub mod endpoint;
pub mod error;
pub mod import;
pub mod mirror;
pub mod output;
pub mod remote;
pub mod sync;
pub mod wrap;

pub use config::{AdminConfig, ConfigResolver, Deadlines};
pub use diff::{DiffEngine, DiffEntry, DiffOptions, DiffReport, EntryStatus, Subject};
pub use endpoint::{Endpoint, EndpointKind, Operands, RemoteRef, SyncDirection};
pub use error::{Error, PreconditionViolation, Result};
pub use import::{ImportEngine, ImportOptions, ImportReport};
pub use mirror::{BlackboardFile, LocalSnapshot, StickieFile};
pub use output::{Discard, Output, Recorder};
pub use sync::{SyncAction, SyncEngine, SyncOptions, SyncReport};
