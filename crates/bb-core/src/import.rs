//! Import of a mirror folder into the record store with ids preserved

use bb_fs::NormalizedPath;
use bb_store::{Blackboard, CallContext, NewBlackboard, NewStickie, RecordStore, Stickie};

use crate::diff::{DiffEngine, DiffOptions};
use crate::endpoint::{Operands, RemoteRef};
use crate::error::PreconditionViolation;
use crate::mirror::{self, BLACKBOARD_FILE, BlackboardFile, LocalSnapshot, LocalStickie, StickieFile};
use crate::output::Output;
use crate::{Error, Result};

/// Options for import operations
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    /// Show per-field values in the preview diff.
    pub detailed: bool,
}

/// Records created by an import, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    pub blackboard: Blackboard,
    pub stickies: Vec<Stickie>,
}

/// Creates a blackboard and its stickies from a mirror folder.
///
/// Every precondition, including record validation, is checked before the
/// first insert. There is no rollback: if a stickie insert still fails,
/// earlier inserts stay and the error names the failing id.
pub struct ImportEngine<'a> {
    /// Working directory that folder paths are relative to
    root: NormalizedPath,
    store: &'a dyn RecordStore,
}

impl<'a> ImportEngine<'a> {
    pub fn new(root: NormalizedPath, store: &'a dyn RecordStore) -> Self {
        Self { root, store }
    }

    pub fn import(
        &self,
        ctx: &CallContext,
        folder: &NormalizedPath,
        options: ImportOptions,
        output: &mut dyn Output,
    ) -> Result<ImportReport> {
        let dir = self.root.resolve(folder);
        self.preview(ctx, folder, options, output);

        let plan = self.check_preconditions(ctx, folder, &dir)?;

        let inserted = self.store.insert_blackboard(ctx, &plan.blackboard)?;
        output.progress(&format!(
            "imported blackboard id={} role={:?}",
            inserted.id, inserted.role
        ));

        let mut stickies = Vec::with_capacity(plan.stickies.len());
        for (file_name, record) in &plan.stickies {
            let stickie = self
                .store
                .insert_stickie(ctx, record)
                .map_err(|source| Error::ImportInsert {
                    id: record.id.clone(),
                    file: file_name.clone(),
                    source,
                })?;
            output.progress(&format!(
                "imported stickie id={} file={}",
                stickie.id, file_name
            ));
            stickies.push(stickie);
        }

        tracing::info!(
            id = %inserted.id,
            stickies = stickies.len(),
            "import complete"
        );
        Ok(ImportReport {
            blackboard: inserted,
            stickies,
        })
    }

    /// Best-effort diff of the folder against the store; failures are logged
    /// and ignored.
    fn preview(
        &self,
        ctx: &CallContext,
        folder: &NormalizedPath,
        options: ImportOptions,
        output: &mut dyn Output,
    ) {
        let operands = Operands {
            remote: RemoteRef::FromFolder,
            folder: folder.clone(),
        };
        let diff_options = DiffOptions {
            detailed: options.detailed,
            include_archived: true,
        };
        match DiffEngine::new(self.root.clone(), self.store).diff(ctx, &operands, diff_options) {
            Ok(report) => {
                for line in report.lines() {
                    output.report(&line);
                }
            }
            Err(e) => tracing::warn!(folder = %folder, error = %e, "import preview failed"),
        }
    }

    /// Preconditions, in order: the header file exists with an id and role
    /// and valid references, no blackboard has that id, every stickie file
    /// has an id that no other file repeats, every stickie record is valid,
    /// and none of the stickie ids exist.
    ///
    /// Returns the exact records to insert.
    fn check_preconditions(
        &self,
        ctx: &CallContext,
        folder: &NormalizedPath,
        dir: &NormalizedPath,
    ) -> Result<ImportPlan> {
        let shown = folder.join(BLACKBOARD_FILE).to_string();
        let board = mirror::load_blackboard(dir)?.ok_or_else(|| {
            PreconditionViolation::MissingBlackboardFile {
                path: shown.clone(),
            }
        })?;
        if board.id.trim().is_empty() {
            return Err(PreconditionViolation::MissingBlackboardId { path: shown }.into());
        }
        if board.role.trim().is_empty() {
            return Err(PreconditionViolation::MissingRole { path: shown }.into());
        }

        let blackboard = validated(&shown, new_blackboard(&board).canonicalized())?;
        if self.store.get_blackboard(ctx, &blackboard.id)?.is_some() {
            return Err(PreconditionViolation::BlackboardExists {
                id: blackboard.id.clone(),
            }
            .into());
        }

        let snapshot = LocalSnapshot::load(ctx, dir, true)?;
        if !snapshot.anonymous.is_empty() {
            let files = snapshot
                .anonymous
                .iter()
                .map(|s| s.file_name.clone())
                .collect();
            return Err(PreconditionViolation::AnonymousStickies { files }.into());
        }
        if let Some(duplicate) = snapshot.duplicates.first() {
            return Err(duplicate_violation(&snapshot, duplicate).into());
        }

        let mut stickies = Vec::with_capacity(snapshot.by_id.len());
        for local in snapshot.by_id.values() {
            let file = folder.join(&local.file_name).to_string();
            let record = validated(
                &file,
                new_stickie(&local.stickie, &blackboard.id).canonicalized(),
            )?;
            if self.store.get_stickie(ctx, &record.id)?.is_some() {
                return Err(PreconditionViolation::StickieExists { id: record.id }.into());
            }
            stickies.push((local.file_name.clone(), record));
        }

        tracing::debug!(
            id = %blackboard.id,
            stickies = stickies.len(),
            "import preconditions hold"
        );
        Ok(ImportPlan {
            blackboard,
            stickies,
        })
    }
}

/// Records an import will insert, checked up front.
struct ImportPlan {
    blackboard: NewBlackboard,
    /// `(file name, record)` in id order.
    stickies: Vec<(String, NewStickie)>,
}

/// Turn a store validation failure into a violation naming `file`.
fn validated<T>(file: &str, record: bb_store::Result<T>) -> Result<T> {
    record.map_err(|e| {
        Error::from(PreconditionViolation::InvalidRecord {
            file: file.to_string(),
            reason: e.to_string(),
        })
    })
}

/// Every file sharing the id of `duplicate`, the kept one first.
fn duplicate_violation(snapshot: &LocalSnapshot, duplicate: &LocalStickie) -> PreconditionViolation {
    let key = mirror::id_key(&duplicate.stickie.id);
    let files = snapshot
        .by_id
        .get(&key)
        .into_iter()
        .chain(
            snapshot
                .duplicates
                .iter()
                .filter(|d| mirror::id_key(&d.stickie.id) == key),
        )
        .map(|s| s.file_name.clone())
        .collect();
    PreconditionViolation::DuplicateStickieId { id: key, files }
}

/// Trimmed value, empty becomes `None`.
fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn new_blackboard(file: &BlackboardFile) -> NewBlackboard {
    NewBlackboard {
        id: file.id.trim().to_string(),
        role: file.role.trim().to_string(),
        store_id: trimmed(&file.store_id),
        conversation_id: trimmed(&file.conversation_id),
        project: trimmed(&file.project),
        task_id: trimmed(&file.task_id),
        background: trimmed(&file.background),
        guidelines: trimmed(&file.guidelines),
        lifecycle: trimmed(&file.lifecycle),
    }
}

/// The stickie is always attached to the imported blackboard, whatever
/// `blackboard_id` the file records.
fn new_stickie(file: &StickieFile, blackboard_id: &str) -> NewStickie {
    let mut labels: Vec<String> = file
        .labels
        .iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();
    labels.sort();
    labels.dedup();

    NewStickie {
        id: file.id.trim().to_string(),
        blackboard_id: blackboard_id.to_string(),
        topic_name: trimmed(&file.topic_name),
        topic_role_name: trimmed(&file.topic_role_name),
        note: trimmed(&file.note),
        code: trimmed(&file.code),
        labels,
        created_by_task_id: trimmed(&file.created_by_task_id),
        priority_level: trimmed(&file.priority_level),
        score: file.score,
        complex_name: file.complex_name.clone(),
        archived: file.archived,
    }
}
