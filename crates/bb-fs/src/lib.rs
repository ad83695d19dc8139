//! Filesystem layer for the blackboard mirror
//!
//! Provides cleaned relative paths, atomic I/O and the YAML/TOML document
//! codec used for `blackboard.yaml`, `*.stickie.yaml` and config files.

pub mod checksum;
pub mod codec;
pub mod error;
pub mod io;
pub mod path;

pub use codec::DocumentStore;
pub use error::{Error, Result};
pub use path::NormalizedPath;
