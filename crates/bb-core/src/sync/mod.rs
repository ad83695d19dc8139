//! One-directional sync from the record store into a mirror folder
//!
//! - **engine**: projects records to files with timestamp-gated writes
//! - **report**: per-file actions taken or planned

mod engine;
mod report;

pub use engine::{SyncEngine, SyncOptions};
pub use report::{SyncAction, SyncReport};
