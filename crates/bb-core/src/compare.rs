//! Field-level comparison of remote records against mirror files

use std::fmt;

use bb_fs::checksum::short_fingerprint;
use bb_store::{Blackboard, Stickie};
use serde::Serialize;

use crate::mirror::{BlackboardFile, StickieFile};
use crate::wrap::wrap_export;

/// Longest value shown in a detailed change before truncation.
const SHORT_VALUE_LIMIT: usize = 80;

/// Fields compared by the diff, in report order.
///
/// Blackboard fields come first, then stickie fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Role,
    ConversationId,
    Project,
    TaskId,
    Background,
    Guidelines,
    Lifecycle,
    Name,
    Archived,
    Note,
    Code,
    Labels,
    PriorityLevel,
    CreatedByTaskId,
    Score,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Role => "role",
            Self::ConversationId => "conversation_id",
            Self::Project => "project",
            Self::TaskId => "task_id",
            Self::Background => "background",
            Self::Guidelines => "guidelines",
            Self::Lifecycle => "lifecycle",
            Self::Name => "name",
            Self::Archived => "archived",
            Self::Note => "note",
            Self::Code => "code",
            Self::Labels => "labels",
            Self::PriorityLevel => "priority_level",
            Self::CreatedByTaskId => "created_by_task_id",
            Self::Score => "score",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One changed field with display values for both sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    pub field: Field,
    pub remote: String,
    pub local: String,
}

/// Collects changes in the order fields are checked.
#[derive(Default)]
struct Changes(Vec<FieldChange>);

impl Changes {
    fn push(&mut self, field: Field, remote: impl Into<String>, local: impl Into<String>) {
        self.0.push(FieldChange {
            field,
            remote: remote.into(),
            local: local.into(),
        });
    }

    /// Trimmed string comparison; absent compares as empty.
    fn text(&mut self, field: Field, remote: Option<&str>, local: Option<&str>) {
        let remote = remote.unwrap_or_default();
        let local = local.unwrap_or_default();
        if remote.trim() != local.trim() {
            self.push(field, remote, local);
        }
    }

    /// Prose comparison: the remote side goes through the export wrap first.
    fn prose(&mut self, field: Field, remote: Option<&str>, local: Option<&str>) {
        let remote = wrap_export(remote.unwrap_or_default());
        self.text(field, Some(remote.as_str()), local);
    }

    /// Long text shown as fingerprints rather than raw values.
    fn fingerprinted(&mut self, field: Field, remote: &str, local: &str) {
        if remote.trim() != local.trim() {
            self.push(field, short_fingerprint(remote), short_fingerprint(local));
        }
    }
}

/// Compare a stored blackboard against its `blackboard.yaml`.
///
/// Timestamps and `store_id` are not compared.
pub fn compare_blackboard(remote: &Blackboard, local: &BlackboardFile) -> Vec<FieldChange> {
    let mut changes = Changes::default();
    changes.text(Field::Role, Some(remote.role.as_str()), Some(local.role.as_str()));
    changes.text(
        Field::ConversationId,
        remote.conversation_id.as_deref(),
        local.conversation_id.as_deref(),
    );
    changes.text(Field::Project, remote.project.as_deref(), local.project.as_deref());
    changes.text(Field::TaskId, remote.task_id.as_deref(), local.task_id.as_deref());
    changes.prose(
        Field::Background,
        remote.background.as_deref(),
        local.background.as_deref(),
    );
    changes.prose(
        Field::Guidelines,
        remote.guidelines.as_deref(),
        local.guidelines.as_deref(),
    );
    changes.text(
        Field::Lifecycle,
        remote.lifecycle.as_deref(),
        local.lifecycle.as_deref(),
    );
    changes.0
}

/// Compare a stored stickie against its `*.stickie.yaml`.
pub fn compare_stickie(remote: &Stickie, local: &StickieFile) -> Vec<FieldChange> {
    let mut changes = Changes::default();
    changes.text(
        Field::Name,
        Some(remote.complex_name.name.as_str()),
        Some(local.name()),
    );
    if remote.archived != local.archived {
        changes.push(
            Field::Archived,
            remote.archived.to_string(),
            local.archived.to_string(),
        );
    }

    let remote_note = wrap_export(remote.note.as_deref().unwrap_or_default());
    changes.fingerprinted(
        Field::Note,
        &remote_note,
        local.note.as_deref().unwrap_or_default(),
    );
    changes.fingerprinted(
        Field::Code,
        remote.code.as_deref().unwrap_or_default(),
        local.code.as_deref().unwrap_or_default(),
    );

    let remote_labels = sorted(&remote.labels);
    let local_labels = sorted(&local.labels);
    if remote_labels != local_labels {
        changes.push(
            Field::Labels,
            render_list(&remote_labels),
            render_list(&local_labels),
        );
    }

    changes.text(
        Field::PriorityLevel,
        remote.priority_level.as_deref(),
        local.priority_level.as_deref(),
    );
    changes.text(
        Field::CreatedByTaskId,
        remote.created_by_task_id.as_deref(),
        local.created_by_task_id.as_deref(),
    );
    if remote.score != local.score {
        changes.push(Field::Score, render_score(remote.score), render_score(local.score));
    }
    changes.0
}

fn sorted(labels: &[String]) -> Vec<&str> {
    let mut out: Vec<&str> = labels.iter().map(String::as_str).collect();
    out.sort_unstable();
    out
}

fn render_list(items: &[&str]) -> String {
    format!("[{}]", items.join(" "))
}

fn render_score(score: Option<f64>) -> String {
    score.map_or_else(|| "(nil)".to_string(), |s| s.to_string())
}

/// Concise rendering: changed field names joined by commas.
pub fn concise(changes: &[FieldChange]) -> String {
    changes
        .iter()
        .map(|c| c.field.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Detailed rendering: ` field[remote="..." local="..."]` per change.
pub fn detailed(changes: &[FieldChange]) -> String {
    changes
        .iter()
        .map(|c| {
            format!(
                " {}[remote={} local={}]",
                c.field,
                quote_short(&c.remote),
                quote_short(&c.local)
            )
        })
        .collect()
}

/// Trim, truncate to the display limit with `...`, and quote.
pub fn quote_short(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.chars().count() > SHORT_VALUE_LIMIT {
        let head: String = trimmed.chars().take(SHORT_VALUE_LIMIT - 3).collect();
        return format!("{:?}", format!("{head}..."));
    }
    format!("{trimmed:?}")
}
