//! Sync actions and report

use std::fmt;

use bb_fs::NormalizedPath;
use serde::Serialize;

/// One per-file step of a sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "path", rename_all = "snake_case")]
pub enum SyncAction {
    Wrote(String),
    SkipUpToDate(String),
    Deleted(String),
    DryRunWrite(String),
    DryRunDelete(String),
}

impl SyncAction {
    pub fn path(&self) -> &str {
        match self {
            Self::Wrote(path)
            | Self::SkipUpToDate(path)
            | Self::Deleted(path)
            | Self::DryRunWrite(path)
            | Self::DryRunDelete(path) => path,
        }
    }

    pub(crate) fn for_path(make: fn(String) -> Self, path: &NormalizedPath) -> Self {
        make(path.as_str().to_string())
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wrote(path) => write!(f, "wrote {path}"),
            Self::SkipUpToDate(path) => write!(f, "skip up-to-date {path}"),
            Self::Deleted(path) => write!(f, "deleted {path}"),
            Self::DryRunWrite(path) => write!(f, "[dry-run] write {path}"),
            Self::DryRunDelete(path) => write!(f, "[dry-run] delete {path}"),
        }
    }
}

/// Report from a sync operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Blackboard that was mirrored
    pub blackboard_id: String,
    /// Actions in the order they were taken
    pub actions: Vec<SyncAction>,
}

impl SyncReport {
    /// Files actually written.
    pub fn writes(&self) -> usize {
        self.count(|a| matches!(a, SyncAction::Wrote(_)))
    }

    /// Files skipped because the mirror was already current.
    pub fn skips(&self) -> usize {
        self.count(|a| matches!(a, SyncAction::SkipUpToDate(_)))
    }

    /// Files actually deleted.
    pub fn deletes(&self) -> usize {
        self.count(|a| matches!(a, SyncAction::Deleted(_)))
    }

    fn count(&self, predicate: impl Fn(&SyncAction) -> bool) -> usize {
        self.actions.iter().filter(|a| predicate(a)).count()
    }
}
