//! In-memory record store

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use crate::model::{Blackboard, NewBlackboard, NewStickie, Page, Stickie};
use crate::{CallContext, Error, RecordStore, Result, ids};

#[derive(Debug, Default)]
struct State {
    blackboards: BTreeMap<String, Blackboard>,
    stickies: BTreeMap<String, Stickie>,
}

/// Record store kept entirely in memory.
///
/// Applies the same validation as [`crate::SqliteStore`]. The `put_*`
/// methods replace whole records, including server-maintained fields, so
/// tests can stage exact timestamps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store a blackboard as-is, replacing any record with the same id.
    pub fn put_blackboard(&self, board: Blackboard) {
        self.state().blackboards.insert(board.id.clone(), board);
    }

    /// Store a stickie as-is, replacing any record with the same id.
    pub fn put_stickie(&self, stickie: Stickie) {
        self.state().stickies.insert(stickie.id.clone(), stickie);
    }

    pub fn blackboard_count(&self) -> usize {
        self.state().blackboards.len()
    }

    pub fn stickie_count(&self) -> usize {
        self.state().stickies.len()
    }
}

impl RecordStore for MemoryStore {
    fn get_blackboard(&self, ctx: &CallContext, id: &str) -> Result<Option<Blackboard>> {
        ctx.check()?;
        let id = ids::canonical(id)?;
        Ok(self.state().blackboards.get(&id).cloned())
    }

    fn list_blackboards(
        &self,
        ctx: &CallContext,
        role: &str,
        page: Page,
    ) -> Result<Vec<Blackboard>> {
        ctx.check()?;
        let mut boards: Vec<Blackboard> = self
            .state()
            .blackboards
            .values()
            .filter(|b| b.role == role)
            .cloned()
            .collect();
        boards.sort_by(|a, b| {
            b.updated
                .cmp(&a.updated)
                .then_with(|| b.created.cmp(&a.created))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(boards
            .into_iter()
            .skip(page.offset)
            .take(page.limit)
            .collect())
    }

    fn insert_blackboard(&self, ctx: &CallContext, board: &NewBlackboard) -> Result<Blackboard> {
        ctx.check()?;
        let row = Blackboard::from_insert(board, Utc::now())?;
        let mut state = self.state();
        if state.blackboards.contains_key(&row.id) {
            return Err(Error::Duplicate {
                kind: "blackboard",
                id: row.id,
            });
        }
        state.blackboards.insert(row.id.clone(), row.clone());
        tracing::debug!(id = %row.id, "memory store: inserted blackboard");
        Ok(row)
    }

    fn get_stickie(&self, ctx: &CallContext, id: &str) -> Result<Option<Stickie>> {
        ctx.check()?;
        let id = ids::canonical(id)?;
        Ok(self.state().stickies.get(&id).cloned())
    }

    fn list_stickies(
        &self,
        ctx: &CallContext,
        blackboard_id: &str,
        page: Page,
    ) -> Result<Vec<Stickie>> {
        ctx.check()?;
        let blackboard_id = ids::canonical(blackboard_id)?;
        // BTreeMap iteration is already ordered by id.
        Ok(self
            .state()
            .stickies
            .values()
            .filter(|s| s.blackboard_id == blackboard_id)
            .skip(page.offset)
            .take(page.limit)
            .cloned()
            .collect())
    }

    fn insert_stickie(&self, ctx: &CallContext, stickie: &NewStickie) -> Result<Stickie> {
        ctx.check()?;
        let row = Stickie::from_insert(stickie, Utc::now())?;
        let mut state = self.state();
        if !state.blackboards.contains_key(&row.blackboard_id) {
            return Err(Error::UnknownBlackboard {
                id: row.blackboard_id,
            });
        }
        if state.stickies.contains_key(&row.id) {
            return Err(Error::Duplicate {
                kind: "stickie",
                id: row.id,
            });
        }
        state.stickies.insert(row.id.clone(), row.clone());
        tracing::debug!(id = %row.id, blackboard_id = %row.blackboard_id, "memory store: inserted stickie");
        Ok(row)
    }
}
