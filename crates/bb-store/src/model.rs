//! Record shapes as held by the store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role-scoped header record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blackboard {
    pub id: String,
    pub role: String,
    pub store_id: String,
    pub conversation_id: Option<String>,
    pub project: Option<String>,
    pub task_id: Option<String>,
    pub background: Option<String>,
    pub guidelines: Option<String>,
    pub lifecycle: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

/// Secondary (name, variant) key of a stickie.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexName {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub variant: String,
}

/// Child note attached to a blackboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stickie {
    pub id: String,
    pub blackboard_id: String,
    pub topic_name: Option<String>,
    pub topic_role_name: Option<String>,
    pub note: Option<String>,
    pub code: Option<String>,
    pub labels: Vec<String>,
    pub created_by_task_id: Option<String>,
    pub edit_count: u32,
    pub priority_level: Option<String>,
    pub score: Option<f64>,
    pub complex_name: ComplexName,
    pub archived: bool,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

/// Insert payload for a blackboard with a caller-chosen id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewBlackboard {
    pub id: String,
    pub role: String,
    /// Assigned by the store when `None`.
    pub store_id: Option<String>,
    pub conversation_id: Option<String>,
    pub project: Option<String>,
    pub task_id: Option<String>,
    pub background: Option<String>,
    pub guidelines: Option<String>,
    pub lifecycle: Option<String>,
}

/// Insert payload for a stickie with a caller-chosen id.
///
/// `edit_count` and timestamps are server-maintained and cannot be set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewStickie {
    pub id: String,
    pub blackboard_id: String,
    pub topic_name: Option<String>,
    pub topic_role_name: Option<String>,
    pub note: Option<String>,
    pub code: Option<String>,
    pub labels: Vec<String>,
    pub created_by_task_id: Option<String>,
    pub priority_level: Option<String>,
    pub score: Option<f64>,
    pub complex_name: ComplexName,
    pub archived: bool,
}

/// Limit/offset window for list calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: usize,
    pub offset: usize,
}

impl Page {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }

    /// The page following this one.
    pub fn next(self) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset + self.limit,
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: 100,
            offset: 0,
        }
    }
}

impl NewBlackboard {
    /// Copy with every id in canonical form.
    ///
    /// Fails the way an insert would: on a malformed id or a blank role. The
    /// store id stays unset when absent; the store generates it on insert.
    pub fn canonicalized(&self) -> crate::Result<Self> {
        if self.role.trim().is_empty() {
            return Err(crate::Error::MissingField { field: "role" });
        }
        Ok(Self {
            id: crate::ids::canonical(&self.id)?,
            store_id: canonical_optional(&self.store_id)?,
            conversation_id: canonical_optional(&self.conversation_id)?,
            task_id: canonical_optional(&self.task_id)?,
            ..self.clone()
        })
    }
}

impl NewStickie {
    /// Copy with `id`, `blackboard_id` and `created_by_task_id` canonical.
    pub fn canonicalized(&self) -> crate::Result<Self> {
        Ok(Self {
            id: crate::ids::canonical(&self.id)?,
            blackboard_id: crate::ids::canonical(&self.blackboard_id)?,
            created_by_task_id: canonical_optional(&self.created_by_task_id)?,
            ..self.clone()
        })
    }
}

/// Map empty strings to `None`, the way the store's columns are NULLed.
pub(crate) fn null_if_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

impl Blackboard {
    /// Build the stored row for an insert, validating ids and required fields.
    pub(crate) fn from_insert(board: &NewBlackboard, now: DateTime<Utc>) -> crate::Result<Self> {
        let id = crate::ids::canonical(&board.id)?;
        if board.role.trim().is_empty() {
            return Err(crate::Error::MissingField { field: "role" });
        }
        let store_id = match board.store_id.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(store_id) => crate::ids::canonical(store_id)?,
            None => crate::ids::generate(),
        };

        Ok(Self {
            id,
            role: board.role.clone(),
            store_id,
            conversation_id: canonical_optional(&board.conversation_id)?,
            project: null_if_empty(&board.project),
            task_id: canonical_optional(&board.task_id)?,
            background: null_if_empty(&board.background),
            guidelines: null_if_empty(&board.guidelines),
            lifecycle: null_if_empty(&board.lifecycle),
            created: Some(now),
            updated: Some(now),
        })
    }
}

impl Stickie {
    /// Build the stored row for an insert, validating ids.
    pub(crate) fn from_insert(stickie: &NewStickie, now: DateTime<Utc>) -> crate::Result<Self> {
        Ok(Self {
            id: crate::ids::canonical(&stickie.id)?,
            blackboard_id: crate::ids::canonical(&stickie.blackboard_id)?,
            topic_name: null_if_empty(&stickie.topic_name),
            topic_role_name: null_if_empty(&stickie.topic_role_name),
            note: null_if_empty(&stickie.note),
            code: null_if_empty(&stickie.code),
            labels: stickie.labels.clone(),
            created_by_task_id: canonical_optional(&stickie.created_by_task_id)?,
            edit_count: 0,
            priority_level: null_if_empty(&stickie.priority_level),
            score: stickie.score,
            complex_name: stickie.complex_name.clone(),
            archived: stickie.archived,
            created: Some(now),
            updated: Some(now),
        })
    }
}

/// Optional UUID references are stored canonical, empty means NULL.
fn canonical_optional(value: &Option<String>) -> crate::Result<Option<String>> {
    null_if_empty(value)
        .map(|v| crate::ids::canonical(&v))
        .transpose()
}
