//! Command implementations for bb-cli

pub mod diff;
pub mod get;
pub mod import;
pub mod list;
pub mod sync;

pub use diff::run_diff;
pub use get::run_get;
pub use import::run_import;
pub use list::run_list;
pub use sync::run_sync;
