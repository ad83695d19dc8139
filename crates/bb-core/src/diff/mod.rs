//! Diff of a remote blackboard graph against a local mirror folder
//!
//! - **engine**: loads both sides and classifies every record
//! - **report**: typed diff records plus text and JSON rendering

mod engine;
mod report;

pub use engine::{DiffEngine, DiffOptions};
pub use report::{DiffEntry, DiffReport, EntryStatus, Subject};
