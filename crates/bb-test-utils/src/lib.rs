//! Shared test utilities for the blackboard-admin workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`records`]: fixed ids and record builders with stable timestamps
//! - [`workspace`]: [`workspace::TestWorkspace`] scratch directory with
//!   mirror-folder helpers

pub mod records;
pub mod workspace;
