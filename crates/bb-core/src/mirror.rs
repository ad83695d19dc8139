//! Local YAML mirror of a blackboard
//!
//! A mirror folder holds one `blackboard.yaml` and any number of
//! `<id>.stickie.yaml` files. Optional fields are omitted when absent.

use std::collections::BTreeMap;

use bb_fs::{DocumentStore, NormalizedPath, io};
use bb_store::{Blackboard, CallContext, ComplexName, Stickie, timestamp};
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::wrap::wrap_export;

/// File name of the blackboard header inside a mirror folder.
pub const BLACKBOARD_FILE: &str = "blackboard.yaml";

/// Suffix shared by every stickie file.
pub const STICKIE_SUFFIX: &str = ".stickie.yaml";

/// On-disk shape of `blackboard.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlackboardFile {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
    #[serde(default)]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guidelines: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
}

/// On-disk shape of a `*.stickie.yaml` file.
///
/// `id` may be missing in hand-written drafts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StickieFile {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub blackboard_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_role_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_task_id: Option<String>,
    #[serde(default)]
    pub edit_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default)]
    pub complex_name: ComplexName,
    #[serde(default)]
    pub archived: bool,
}

impl BlackboardFile {
    /// Project a stored blackboard into its file shape.
    ///
    /// Prose fields are wrapped at the export width.
    pub fn from_remote(board: &Blackboard) -> Self {
        Self {
            id: board.id.clone(),
            store_id: present(&board.store_id),
            role: board.role.clone(),
            conversation_id: board.conversation_id.as_deref().and_then(present),
            project: board.project.as_deref().and_then(present),
            task_id: board.task_id.as_deref().and_then(present),
            background: board.background.as_deref().and_then(prose),
            guidelines: board.guidelines.as_deref().and_then(prose),
            lifecycle: board.lifecycle.as_deref().and_then(present),
            created: board.created.as_ref().map(timestamp::format),
            updated: board.updated.as_ref().map(timestamp::format),
        }
    }
}

impl StickieFile {
    /// Project a stored stickie into its file shape.
    pub fn from_remote(stickie: &Stickie) -> Self {
        let mut labels = stickie.labels.clone();
        labels.sort();
        Self {
            id: stickie.id.clone(),
            blackboard_id: stickie.blackboard_id.clone(),
            topic_name: stickie.topic_name.as_deref().and_then(present),
            topic_role_name: stickie.topic_role_name.as_deref().and_then(present),
            note: stickie.note.as_deref().and_then(prose),
            code: stickie.code.as_deref().and_then(present),
            labels,
            created: stickie.created.as_ref().map(timestamp::format),
            updated: stickie.updated.as_ref().map(timestamp::format),
            created_by_task_id: stickie.created_by_task_id.as_deref().and_then(present),
            edit_count: stickie.edit_count,
            priority_level: stickie.priority_level.as_deref().and_then(present),
            score: stickie.score,
            complex_name: stickie.complex_name.clone(),
            archived: stickie.archived,
        }
    }

    /// The stickie's display name.
    pub fn name(&self) -> &str {
        &self.complex_name.name
    }
}

fn present(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn prose(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| wrap_export(value))
}

/// Mirror file name for a stickie id.
pub fn stickie_file_name(id: &str) -> String {
    format!("{id}{STICKIE_SUFFIX}")
}

/// Key used to match ids across the store and the mirror.
///
/// UUIDs compare in canonical form; anything else compares trimmed and
/// lowercased.
pub fn id_key(raw: &str) -> String {
    bb_store::ids::canonical(raw).unwrap_or_else(|_| raw.trim().to_lowercase())
}

/// Read `blackboard.yaml` from `dir`, `None` when the file does not exist.
pub fn load_blackboard(dir: &NormalizedPath) -> Result<Option<BlackboardFile>> {
    let path = dir.join(BLACKBOARD_FILE);
    Ok(DocumentStore::new().load_optional(&path)?)
}

/// A stickie file together with the name it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalStickie {
    pub file_name: String,
    pub stickie: StickieFile,
}

/// Everything read from one mirror folder.
#[derive(Debug, Clone, Default)]
pub struct LocalSnapshot {
    pub blackboard: Option<BlackboardFile>,
    /// Stickies with an id, keyed by [`id_key`].
    pub by_id: BTreeMap<String, LocalStickie>,
    /// Stickies without an id, sorted by file name.
    pub anonymous: Vec<LocalStickie>,
    /// Files whose id was already taken by an earlier file, in name order.
    pub duplicates: Vec<LocalStickie>,
}

impl LocalSnapshot {
    /// Load a mirror folder.
    ///
    /// A missing folder is an empty snapshot. Unreadable or malformed files
    /// are errors. Archived stickies are dropped unless `include_archived`.
    pub fn load(ctx: &CallContext, dir: &NormalizedPath, include_archived: bool) -> Result<Self> {
        if !dir.is_dir() {
            tracing::debug!(dir = %dir, "mirror folder missing, using empty snapshot");
            return Ok(Self::default());
        }

        ctx.check()?;
        let mut snapshot = Self {
            blackboard: load_blackboard(dir)?,
            ..Self::default()
        };

        let documents = DocumentStore::new();
        for file_name in io::list_file_names(dir, STICKIE_SUFFIX)? {
            ctx.check()?;
            let stickie: StickieFile = documents.load(&dir.join(&file_name))?;
            if stickie.archived && !include_archived {
                continue;
            }

            let local = LocalStickie { file_name, stickie };
            if local.stickie.id.trim().is_empty() {
                snapshot.anonymous.push(local);
                continue;
            }

            let key = id_key(&local.stickie.id);
            if let Some(existing) = snapshot.by_id.get(&key) {
                tracing::warn!(
                    id = %key,
                    kept = %existing.file_name,
                    ignored = %local.file_name,
                    "duplicate stickie id in mirror folder"
                );
                snapshot.duplicates.push(local);
                continue;
            }
            snapshot.by_id.insert(key, local);
        }

        tracing::debug!(
            dir = %dir,
            stickies = snapshot.by_id.len(),
            anonymous = snapshot.anonymous.len(),
            "loaded mirror snapshot"
        );
        Ok(snapshot)
    }

    /// Total number of stickie files kept in the snapshot.
    pub fn stickie_count(&self) -> usize {
        self.by_id.len() + self.anonymous.len()
    }
}

#[derive(Deserialize)]
struct RecordedUpdate {
    #[serde(default)]
    updated: Option<String>,
}

/// Whether the file at `path` already records an `updated` timestamp at or
/// after `remote_updated`.
///
/// A missing remote timestamp, or a local file that is missing, unreadable,
/// malformed or lacks a parseable timestamp, means the file is stale.
pub fn is_up_to_date(path: &NormalizedPath, remote_updated: Option<&str>) -> bool {
    let Some(remote) = remote_updated.and_then(timestamp::parse) else {
        return false;
    };
    if !path.is_file() {
        return false;
    }
    let Ok(recorded) = DocumentStore::new().load::<RecordedUpdate>(path) else {
        return false;
    };
    recorded
        .updated
        .as_deref()
        .and_then(timestamp::parse)
        .is_some_and(|local| local >= remote)
}
