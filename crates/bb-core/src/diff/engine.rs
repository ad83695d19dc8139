//! Diff engine

use std::collections::BTreeMap;

use bb_fs::NormalizedPath;
use bb_store::{CallContext, RecordStore, Stickie};

use super::report::{DiffEntry, DiffReport, EntryStatus, Subject};
use crate::Result;
use crate::compare::{compare_blackboard, compare_stickie};
use crate::endpoint::Operands;
use crate::mirror::{LocalSnapshot, LocalStickie, id_key};
use crate::remote::fetch_all_stickies;

/// Options for a diff run
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffOptions {
    /// Render changed records with per-field values instead of names only.
    pub detailed: bool,
    /// Compare archived stickies too.
    pub include_archived: bool,
}

/// Compares a remote blackboard graph with a mirror folder.
pub struct DiffEngine<'a> {
    /// Working directory that folder endpoints are relative to
    root: NormalizedPath,
    store: &'a dyn RecordStore,
}

impl<'a> DiffEngine<'a> {
    pub fn new(root: NormalizedPath, store: &'a dyn RecordStore) -> Self {
        Self { root, store }
    }

    /// Classify the blackboard header and every stickie on either side.
    ///
    /// A missing remote blackboard or a missing folder is reported, not an
    /// error. Malformed mirror files and store failures abort the run.
    pub fn diff(
        &self,
        ctx: &CallContext,
        operands: &Operands,
        options: DiffOptions,
    ) -> Result<DiffReport> {
        let dir = self.root.resolve(&operands.folder);
        let requested = operands.remote_id(&dir)?;
        tracing::debug!(id = %requested, folder = %operands.folder, "starting diff");

        let remote = self.store.get_blackboard(ctx, &requested)?;
        let local = LocalSnapshot::load(ctx, &dir, options.include_archived)?;
        let board_id = remote
            .as_ref()
            .map_or_else(|| id_key(&requested), |b| b.id.clone());

        let mut entries = Vec::new();
        entries.push(match (&remote, &local.blackboard) {
            (None, None) => DiffEntry::new(
                EntryStatus::Missing,
                Subject::Blackboard {
                    id: board_id.clone(),
                    role: String::new(),
                },
            ),
            (Some(remote), None) => DiffEntry::new(
                EntryStatus::RemoteOnly,
                Subject::Blackboard {
                    id: remote.id.clone(),
                    role: remote.role.clone(),
                },
            ),
            (None, Some(file)) => DiffEntry::new(
                EntryStatus::LocalOnly,
                Subject::Blackboard {
                    id: board_id.clone(),
                    role: file.role.clone(),
                },
            ),
            (Some(remote), Some(file)) => DiffEntry::compared(
                Subject::Blackboard {
                    id: remote.id.clone(),
                    role: remote.role.clone(),
                },
                compare_blackboard(remote, file),
            ),
        });

        let remote_stickies: BTreeMap<String, Stickie> = match &remote {
            Some(board) => fetch_all_stickies(self.store, ctx, &board.id)?
                .into_iter()
                .filter(|s| options.include_archived || !s.archived)
                .map(|s| (id_key(&s.id), s))
                .collect(),
            None => BTreeMap::new(),
        };

        for (key, stickie) in &remote_stickies {
            let subject = Subject::Stickie {
                id: Some(stickie.id.clone()),
                name: stickie.complex_name.name.clone(),
                file: None,
                owner: None,
            };
            entries.push(match local.by_id.get(key) {
                Some(file) => DiffEntry::compared(subject, compare_stickie(stickie, &file.stickie)),
                None => DiffEntry::new(EntryStatus::RemoteOnly, subject),
            });
        }

        for (key, file) in &local.by_id {
            if remote_stickies.contains_key(key) {
                continue;
            }
            let owner = self.foreign_owner(ctx, key, &board_id)?;
            entries.push(local_only(file, Some(file.stickie.id.trim().to_string()), owner));
        }

        for file in &local.anonymous {
            entries.push(local_only(file, None, None));
        }

        let report = DiffReport {
            blackboard_id: board_id,
            detailed: options.detailed,
            entries,
        };
        tracing::debug!(
            changed = report.count(EntryStatus::Changed),
            remote_only = report.count(EntryStatus::RemoteOnly),
            local_only = report.count(EntryStatus::LocalOnly),
            "diff complete"
        );
        Ok(report)
    }

    /// The blackboard that owns `key` in the store, when it is not `board_id`.
    ///
    /// Ids that are not UUIDs cannot be in the store and are skipped.
    fn foreign_owner(
        &self,
        ctx: &CallContext,
        key: &str,
        board_id: &str,
    ) -> Result<Option<String>> {
        if bb_store::ids::canonical(key).is_err() {
            return Ok(None);
        }
        let owner = self
            .store
            .get_stickie(ctx, key)?
            .map(|s| s.blackboard_id)
            .filter(|owner| owner != board_id);
        Ok(owner)
    }
}

fn local_only(file: &LocalStickie, id: Option<String>, owner: Option<String>) -> DiffEntry {
    DiffEntry::new(
        EntryStatus::LocalOnly,
        Subject::Stickie {
            id,
            name: file.stickie.name().to_string(),
            file: Some(file.file_name.clone()),
            owner,
        },
    )
}
