//! Typed diff records and their renderings

use std::fmt;

use serde::Serialize;

use crate::Result;
use crate::compare::{self, FieldChange};

/// Classification of one compared record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Unchanged,
    Changed,
    RemoteOnly,
    LocalOnly,
    /// Neither side has the record.
    Missing,
}

impl EntryStatus {
    /// Leading marker of the report line.
    pub fn marker(self) -> char {
        match self {
            Self::Unchanged => '=',
            Self::Changed => '~',
            Self::RemoteOnly => '+',
            Self::LocalOnly => '-',
            Self::Missing => '?',
        }
    }
}

/// The record an entry is about.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Subject {
    Blackboard {
        id: String,
        role: String,
    },
    Stickie {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        name: String,
        /// Mirror file, for local-only stickies.
        #[serde(skip_serializing_if = "Option::is_none")]
        file: Option<String>,
        /// Blackboard that owns a local-only id in the store.
        #[serde(skip_serializing_if = "Option::is_none")]
        owner: Option<String>,
    },
}

/// One classified record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffEntry {
    pub status: EntryStatus,
    pub subject: Subject,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<FieldChange>,
}

impl DiffEntry {
    pub(crate) fn new(status: EntryStatus, subject: Subject) -> Self {
        Self {
            status,
            subject,
            changes: Vec::new(),
        }
    }

    /// Classify a record present on both sides from its field changes.
    pub(crate) fn compared(subject: Subject, changes: Vec<FieldChange>) -> Self {
        let status = if changes.is_empty() {
            EntryStatus::Unchanged
        } else {
            EntryStatus::Changed
        };
        Self {
            status,
            subject,
            changes,
        }
    }

    /// Render as one report line.
    pub fn render(&self, detailed: bool) -> String {
        let marker = self.status.marker();
        match &self.subject {
            Subject::Blackboard { id, role } => match self.status {
                EntryStatus::Missing => {
                    format!("{marker} blackboard id={id} (neither remote nor local present)")
                }
                EntryStatus::RemoteOnly => format!(
                    "{marker} blackboard id={id} role={role:?} (remote-only: no local blackboard.yaml)"
                ),
                EntryStatus::LocalOnly => format!(
                    "{marker} blackboard id={id} role={role:?} (local-only: no remote blackboard)"
                ),
                EntryStatus::Unchanged => format!("{marker} blackboard id={id} role={role:?}"),
                EntryStatus::Changed if detailed => format!(
                    "{marker} blackboard id={id} role={role:?}:{}",
                    compare::detailed(&self.changes)
                ),
                EntryStatus::Changed => format!(
                    "{marker} blackboard id={id} role={role:?} fields:{}",
                    compare::concise(&self.changes)
                ),
            },
            Subject::Stickie {
                id,
                name,
                file,
                owner,
            } => {
                let file = file.as_deref().unwrap_or_default();
                let Some(id) = id else {
                    return format!("{marker} stickie name={name:?} file={file} (local-only, no id)");
                };
                match self.status {
                    EntryStatus::Unchanged | EntryStatus::Missing => {
                        format!("{marker} stickie id={id} name={name:?}")
                    }
                    EntryStatus::Changed if detailed => format!(
                        "{marker} stickie id={id} name={name:?} changed:{}",
                        compare::detailed(&self.changes)
                    ),
                    EntryStatus::Changed => format!(
                        "{marker} stickie id={id} name={name:?} fields:{}",
                        compare::concise(&self.changes)
                    ),
                    EntryStatus::RemoteOnly => {
                        format!("{marker} stickie id={id} name={name:?} (remote-only)")
                    }
                    EntryStatus::LocalOnly => match owner {
                        Some(owner) => format!(
                            "{marker} stickie id={id} name={name:?} file={file} (local-only, belongs to blackboard {owner})"
                        ),
                        None => format!(
                            "{marker} stickie id={id} name={name:?} file={file} (local-only)"
                        ),
                    },
                }
            }
        }
    }
}

/// Every record classified by one diff run, header first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffReport {
    pub blackboard_id: String,
    #[serde(skip)]
    pub detailed: bool,
    pub entries: Vec<DiffEntry>,
}

impl DiffReport {
    /// Report lines in record order.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.render(self.detailed)).collect()
    }

    /// Pretty-printed JSON form of the records.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of entries with the given status.
    pub fn count(&self, status: EntryStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }

    /// True when every record is unchanged.
    pub fn is_clean(&self) -> bool {
        self.entries
            .iter()
            .all(|e| e.status == EntryStatus::Unchanged)
    }
}

impl fmt::Display for DiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::Field;
    use pretty_assertions::assert_eq;

    fn stickie(id: Option<&str>, name: &str) -> Subject {
        Subject::Stickie {
            id: id.map(str::to_string),
            name: name.to_string(),
            file: Some("x.stickie.yaml".to_string()),
            owner: None,
        }
    }

    #[test]
    fn renders_blackboard_lines() {
        let subject = Subject::Blackboard {
            id: "B".into(),
            role: "planner".into(),
        };
        let changed = DiffEntry::compared(
            subject.clone(),
            vec![FieldChange {
                field: Field::Project,
                remote: "a".into(),
                local: "b".into(),
            }],
        );

        assert_eq!(
            DiffEntry::new(EntryStatus::Unchanged, subject.clone()).render(false),
            r#"= blackboard id=B role="planner""#
        );
        assert_eq!(
            changed.render(false),
            r#"~ blackboard id=B role="planner" fields:project"#
        );
        assert_eq!(
            changed.render(true),
            r#"~ blackboard id=B role="planner": project[remote="a" local="b"]"#
        );
        assert_eq!(
            DiffEntry::new(EntryStatus::Missing, subject).render(false),
            "? blackboard id=B (neither remote nor local present)"
        );
    }

    #[test]
    fn renders_stickie_lines() {
        assert_eq!(
            DiffEntry::new(EntryStatus::RemoteOnly, stickie(Some("A"), "alpha")).render(false),
            r#"+ stickie id=A name="alpha" (remote-only)"#
        );
        assert_eq!(
            DiffEntry::new(EntryStatus::LocalOnly, stickie(Some("C"), "")).render(false),
            r#"- stickie id=C name="" file=x.stickie.yaml (local-only)"#
        );
        assert_eq!(
            DiffEntry::new(EntryStatus::LocalOnly, stickie(None, "draft")).render(false),
            r#"- stickie name="draft" file=x.stickie.yaml (local-only, no id)"#
        );
    }

    #[test]
    fn json_uses_snake_case_tags() {
        let report = DiffReport {
            blackboard_id: "B".into(),
            detailed: false,
            entries: vec![DiffEntry::new(
                EntryStatus::RemoteOnly,
                Subject::Stickie {
                    id: Some("A".into()),
                    name: "alpha".into(),
                    file: None,
                    owner: None,
                },
            )],
        };
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["entries"][0]["status"], "remote_only");
        assert_eq!(json["entries"][0]["subject"]["kind"], "stickie");
        assert!(json["entries"][0]["subject"].get("file").is_none());
    }
}
