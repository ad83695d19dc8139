//! Sync engine implementation

use std::collections::BTreeSet;

use bb_fs::{DocumentStore, NormalizedPath, io};
use bb_store::{CallContext, RecordStore};
use serde::Serialize;

use super::report::{SyncAction, SyncReport};
use crate::endpoint::Operands;
use crate::mirror::{
    BLACKBOARD_FILE, BlackboardFile, STICKIE_SUFFIX, StickieFile, is_up_to_date,
    stickie_file_name,
};
use crate::output::Output;
use crate::remote::fetch_all_stickies;
use crate::{Error, Result};

/// Options for sync operations
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Remove `*.stickie.yaml` files with no remote counterpart.
    pub delete: bool,
    /// Report what would happen without touching the folder.
    pub dry_run: bool,
    /// Rewrite files even when their recorded `updated` is current.
    pub force: bool,
    /// Omit `id` from written stickie files. File names still carry the id.
    pub clear_ids: bool,
}

/// Projects a remote blackboard and its stickies into a mirror folder.
///
/// Only the remote -> folder direction exists; remote records are never
/// modified.
pub struct SyncEngine<'a> {
    /// Working directory that folder endpoints are relative to
    root: NormalizedPath,
    store: &'a dyn RecordStore,
    documents: DocumentStore,
}

/// Per-run state: where files go and what has been done.
struct Run<'r> {
    ctx: &'r CallContext,
    dir: NormalizedPath,
    folder: &'r NormalizedPath,
    options: SyncOptions,
    report: SyncReport,
    output: &'r mut dyn Output,
}

impl<'a> SyncEngine<'a> {
    pub fn new(root: NormalizedPath, store: &'a dyn RecordStore) -> Self {
        Self {
            root,
            store,
            documents: DocumentStore::new(),
        }
    }

    /// Mirror the remote blackboard into the operands' folder.
    ///
    /// Errors abort the run; files already written stay written.
    pub fn sync(
        &self,
        ctx: &CallContext,
        operands: &Operands,
        options: SyncOptions,
        output: &mut dyn Output,
    ) -> Result<SyncReport> {
        let dir = self.root.resolve(&operands.folder);
        let id = operands.remote_id(&dir)?;
        tracing::debug!(id = %id, folder = %operands.folder, ?options, "starting sync");

        if !options.dry_run {
            ctx.check()?;
            io::create_dir_all(&dir)?;
        }

        let board = self
            .store
            .get_blackboard(ctx, &id)?
            .ok_or_else(|| Error::NotFound {
                kind: "blackboard",
                id: id.clone(),
            })?;

        let mut run = Run {
            ctx,
            dir,
            folder: &operands.folder,
            options,
            report: SyncReport {
                blackboard_id: board.id.clone(),
                actions: Vec::new(),
            },
            output,
        };

        let header = BlackboardFile::from_remote(&board);
        self.project(&mut run, BLACKBOARD_FILE, header.updated.as_deref(), &header)?;

        let mut seen = BTreeSet::new();
        for stickie in fetch_all_stickies(self.store, ctx, &board.id)? {
            let mut file = StickieFile::from_remote(&stickie);
            if options.clear_ids {
                file.id.clear();
            }
            let name = stickie_file_name(&stickie.id);
            self.project(&mut run, &name, file.updated.as_deref(), &file)?;
            seen.insert(name);
        }

        if options.delete {
            self.delete_orphans(&mut run, &seen)?;
        }

        tracing::info!(
            id = %board.id,
            writes = run.report.writes(),
            skips = run.report.skips(),
            deletes = run.report.deletes(),
            "sync complete"
        );
        Ok(run.report)
    }

    /// Write one projected file unless the mirror already records an
    /// `updated` at or after the remote one.
    fn project<T: Serialize>(
        &self,
        run: &mut Run<'_>,
        name: &str,
        remote_updated: Option<&str>,
        value: &T,
    ) -> Result<()> {
        run.ctx.check()?;
        let path = run.dir.join(name);
        let shown = run.folder.join(name);

        let fresh = !run.options.force && is_up_to_date(&path, remote_updated);
        let action: fn(String) -> SyncAction = if fresh {
            SyncAction::SkipUpToDate
        } else if run.options.dry_run {
            SyncAction::DryRunWrite
        } else {
            self.documents.save(&path, value)?;
            SyncAction::Wrote
        };
        run.record(SyncAction::for_path(action, &shown));
        Ok(())
    }

    /// Remove stickie files that no remote stickie maps to.
    fn delete_orphans(&self, run: &mut Run<'_>, seen: &BTreeSet<String>) -> Result<()> {
        if !run.dir.is_dir() {
            return Ok(());
        }
        for name in io::list_file_names(&run.dir, STICKIE_SUFFIX)? {
            if seen.contains(&name) {
                continue;
            }
            run.ctx.check()?;
            let shown = run.folder.join(&name);
            if run.options.dry_run {
                run.record(SyncAction::for_path(SyncAction::DryRunDelete, &shown));
            } else {
                io::remove_file(&run.dir.join(&name))?;
                run.record(SyncAction::for_path(SyncAction::Deleted, &shown));
            }
        }
        Ok(())
    }
}

impl Run<'_> {
    fn record(&mut self, action: SyncAction) {
        self.output.progress(&action.to_string());
        self.report.actions.push(action);
    }
}
