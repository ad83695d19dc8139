//! Record access for blackboards and their stickies
//!
//! The reconciliation engines talk to the relational store only through the
//! [`RecordStore`] trait:
//!
//! - get-blackboard-by-id / list-blackboards-by-role
//! - insert-blackboard-with-explicit-id
//! - get-stickie-by-id / list-stickies-by-blackboard (paged)
//! - insert-stickie-with-explicit-id
//!
//! Two implementations are provided: [`SqliteStore`] (the persistent store
//! used by the CLI) and [`MemoryStore`] (tests and scratch previews). Every
//! call takes a [`CallContext`] carrying the caller's deadline and
//! cancellation flag.

pub mod context;
pub mod error;
pub mod ids;
pub mod memory;
pub mod model;
pub mod sqlite;
pub mod timestamp;

pub use context::CallContext;
pub use error::{Error, Result};
pub use memory::MemoryStore;
pub use model::{Blackboard, ComplexName, NewBlackboard, NewStickie, Page, Stickie};
pub use sqlite::SqliteStore;

/// Blocking access to blackboard and stickie records.
///
/// Lookups return `Ok(None)` for missing records; only backend failures,
/// invalid ids and deadline/cancellation surface as errors.
pub trait RecordStore {
    /// Fetch a blackboard by id.
    fn get_blackboard(&self, ctx: &CallContext, id: &str) -> Result<Option<Blackboard>>;

    /// List blackboards for a role, most recently updated first.
    fn list_blackboards(&self, ctx: &CallContext, role: &str, page: Page)
    -> Result<Vec<Blackboard>>;

    /// Insert a blackboard keeping the caller-provided id.
    ///
    /// The store assigns `created`/`updated` and, when absent, `store_id`.
    fn insert_blackboard(&self, ctx: &CallContext, board: &NewBlackboard) -> Result<Blackboard>;

    /// Fetch a stickie by id, regardless of which blackboard owns it.
    fn get_stickie(&self, ctx: &CallContext, id: &str) -> Result<Option<Stickie>>;

    /// List one page of a blackboard's stickies, ordered by id.
    fn list_stickies(
        &self,
        ctx: &CallContext,
        blackboard_id: &str,
        page: Page,
    ) -> Result<Vec<Stickie>>;

    /// Insert a stickie keeping the caller-provided id.
    ///
    /// The store assigns `created`/`updated` and starts `edit_count` at zero.
    fn insert_stickie(&self, ctx: &CallContext, stickie: &NewStickie) -> Result<Stickie>;
}
