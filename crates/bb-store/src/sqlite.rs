//! SQLite-backed record store

use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::model::{Blackboard, ComplexName, NewBlackboard, NewStickie, Page, Stickie};
use crate::{CallContext, Error, RecordStore, Result, ids, timestamp};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS blackboards (
    id              TEXT PRIMARY KEY,
    store_id        TEXT NOT NULL,
    role_name       TEXT NOT NULL,
    conversation_id TEXT,
    project_name    TEXT,
    task_id         TEXT,
    background      TEXT,
    guidelines      TEXT,
    lifecycle       TEXT,
    created         TEXT NOT NULL,
    updated         TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_blackboards_role ON blackboards(role_name, updated);

CREATE TABLE IF NOT EXISTS stickies (
    id                 TEXT PRIMARY KEY,
    blackboard_id      TEXT NOT NULL REFERENCES blackboards(id) ON DELETE CASCADE,
    topic_name         TEXT,
    topic_role_name    TEXT,
    note               TEXT,
    code               TEXT,
    labels             TEXT NOT NULL DEFAULT '[]',
    created_by_task_id TEXT,
    edit_count         INTEGER NOT NULL DEFAULT 0,
    priority_level     TEXT,
    score              REAL,
    complex_name       TEXT NOT NULL DEFAULT '{"name":"","variant":""}',
    archived           INTEGER NOT NULL DEFAULT 0,
    created            TEXT NOT NULL,
    updated            TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_stickies_blackboard ON stickies(blackboard_id, id);
"#;

const BLACKBOARD_COLUMNS: &str = "id, store_id, role_name, conversation_id, project_name, task_id, \
     background, guidelines, lifecycle, created, updated";

const STICKIE_COLUMNS: &str = "id, blackboard_id, topic_name, topic_role_name, note, code, labels, \
     created_by_task_id, edit_count, priority_level, score, complex_name, archived, created, updated";

/// Default lock wait when the caller has no deadline.
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Record store persisted in a single SQLite database file.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and apply the schema.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let conn = Connection::open(path)?;
        conn.query_row("PRAGMA journal_mode=WAL;", [], |_| Ok(()))?;
        tracing::debug!(path = %path.display(), "opened sqlite store");
        Self::init(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
        conn.execute("PRAGMA foreign_keys=ON;", [])?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Check the context and bound lock waits by the remaining deadline.
    fn prepare_call(&self, ctx: &CallContext) -> Result<()> {
        ctx.check()?;
        if let Some(remaining) = ctx.remaining() {
            self.conn.busy_timeout(remaining)?;
        }
        Ok(())
    }

    fn blackboard_exists(&self, id: &str) -> Result<bool> {
        let found = self
            .conn
            .query_row("SELECT 1 FROM blackboards WHERE id = ?1", [id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    fn stickie_exists(&self, id: &str) -> Result<bool> {
        let found = self
            .conn
            .query_row("SELECT 1 FROM stickies WHERE id = ?1", [id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }
}

/// Raw column values before timestamp/JSON decoding.
struct BlackboardRow {
    board: Blackboard,
    created: String,
    updated: String,
}

fn read_blackboard(row: &Row<'_>) -> rusqlite::Result<BlackboardRow> {
    Ok(BlackboardRow {
        board: Blackboard {
            id: row.get(0)?,
            store_id: row.get(1)?,
            role: row.get(2)?,
            conversation_id: row.get(3)?,
            project: row.get(4)?,
            task_id: row.get(5)?,
            background: row.get(6)?,
            guidelines: row.get(7)?,
            lifecycle: row.get(8)?,
            created: None,
            updated: None,
        },
        created: row.get(9)?,
        updated: row.get(10)?,
    })
}

impl BlackboardRow {
    fn decode(self) -> Result<Blackboard> {
        let mut board = self.board;
        board.created = Some(parse_column("blackboards.created", &self.created)?);
        board.updated = Some(parse_column("blackboards.updated", &self.updated)?);
        Ok(board)
    }
}

struct StickieRow {
    stickie: Stickie,
    labels: String,
    complex_name: String,
    created: String,
    updated: String,
}

fn read_stickie(row: &Row<'_>) -> rusqlite::Result<StickieRow> {
    Ok(StickieRow {
        stickie: Stickie {
            id: row.get(0)?,
            blackboard_id: row.get(1)?,
            topic_name: row.get(2)?,
            topic_role_name: row.get(3)?,
            note: row.get(4)?,
            code: row.get(5)?,
            labels: Vec::new(),
            created_by_task_id: row.get(7)?,
            edit_count: row.get(8)?,
            priority_level: row.get(9)?,
            score: row.get(10)?,
            complex_name: ComplexName::default(),
            archived: row.get(12)?,
            created: None,
            updated: None,
        },
        labels: row.get(6)?,
        complex_name: row.get(11)?,
        created: row.get(13)?,
        updated: row.get(14)?,
    })
}

impl StickieRow {
    fn decode(self) -> Result<Stickie> {
        let mut stickie = self.stickie;
        stickie.labels = serde_json::from_str(&self.labels)?;
        stickie.complex_name = serde_json::from_str(&self.complex_name)?;
        stickie.created = Some(parse_column("stickies.created", &self.created)?);
        stickie.updated = Some(parse_column("stickies.updated", &self.updated)?);
        Ok(stickie)
    }
}

fn parse_column(column: &'static str, value: &str) -> Result<DateTime<Utc>> {
    timestamp::parse(value).ok_or_else(|| Error::Timestamp {
        column,
        value: value.to_string(),
    })
}

fn to_sql_limit(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl RecordStore for SqliteStore {
    fn get_blackboard(&self, ctx: &CallContext, id: &str) -> Result<Option<Blackboard>> {
        self.prepare_call(ctx)?;
        let id = ids::canonical(id)?;
        let sql = format!("SELECT {BLACKBOARD_COLUMNS} FROM blackboards WHERE id = ?1");
        self.conn
            .query_row(&sql, [&id], read_blackboard)
            .optional()?
            .map(BlackboardRow::decode)
            .transpose()
    }

    fn list_blackboards(
        &self,
        ctx: &CallContext,
        role: &str,
        page: Page,
    ) -> Result<Vec<Blackboard>> {
        self.prepare_call(ctx)?;
        let sql = format!(
            "SELECT {BLACKBOARD_COLUMNS} FROM blackboards WHERE role_name = ?1 \
             ORDER BY updated DESC, created DESC, id ASC LIMIT ?2 OFFSET ?3"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![role, to_sql_limit(page.limit), to_sql_limit(page.offset)],
            read_blackboard,
        )?;

        let mut boards = Vec::new();
        for row in rows {
            boards.push(row?.decode()?);
        }
        Ok(boards)
    }

    fn insert_blackboard(&self, ctx: &CallContext, board: &NewBlackboard) -> Result<Blackboard> {
        self.prepare_call(ctx)?;
        let row = Blackboard::from_insert(board, Utc::now())?;
        if self.blackboard_exists(&row.id)? {
            return Err(Error::Duplicate {
                kind: "blackboard",
                id: row.id,
            });
        }

        let created = row.created.as_ref().map(timestamp::format);
        let updated = row.updated.as_ref().map(timestamp::format);
        self.conn.execute(
            &format!(
                "INSERT INTO blackboards ({BLACKBOARD_COLUMNS}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
            ),
            params![
                row.id,
                row.store_id,
                row.role,
                row.conversation_id,
                row.project,
                row.task_id,
                row.background,
                row.guidelines,
                row.lifecycle,
                created,
                updated,
            ],
        )?;
        tracing::info!(id = %row.id, role = %row.role, "inserted blackboard");
        Ok(row)
    }

    fn get_stickie(&self, ctx: &CallContext, id: &str) -> Result<Option<Stickie>> {
        self.prepare_call(ctx)?;
        let id = ids::canonical(id)?;
        let sql = format!("SELECT {STICKIE_COLUMNS} FROM stickies WHERE id = ?1");
        self.conn
            .query_row(&sql, [&id], read_stickie)
            .optional()?
            .map(StickieRow::decode)
            .transpose()
    }

    fn list_stickies(
        &self,
        ctx: &CallContext,
        blackboard_id: &str,
        page: Page,
    ) -> Result<Vec<Stickie>> {
        self.prepare_call(ctx)?;
        let blackboard_id = ids::canonical(blackboard_id)?;
        let sql = format!(
            "SELECT {STICKIE_COLUMNS} FROM stickies WHERE blackboard_id = ?1 \
             ORDER BY id ASC LIMIT ?2 OFFSET ?3"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![
                blackboard_id,
                to_sql_limit(page.limit),
                to_sql_limit(page.offset)
            ],
            read_stickie,
        )?;

        let mut stickies = Vec::new();
        for row in rows {
            stickies.push(row?.decode()?);
        }
        Ok(stickies)
    }

    fn insert_stickie(&self, ctx: &CallContext, stickie: &NewStickie) -> Result<Stickie> {
        self.prepare_call(ctx)?;
        let row = Stickie::from_insert(stickie, Utc::now())?;
        if !self.blackboard_exists(&row.blackboard_id)? {
            return Err(Error::UnknownBlackboard {
                id: row.blackboard_id,
            });
        }
        if self.stickie_exists(&row.id)? {
            return Err(Error::Duplicate {
                kind: "stickie",
                id: row.id,
            });
        }

        let labels = serde_json::to_string(&row.labels)?;
        let complex_name = serde_json::to_string(&row.complex_name)?;
        let created = row.created.as_ref().map(timestamp::format);
        let updated = row.updated.as_ref().map(timestamp::format);
        self.conn.execute(
            &format!(
                "INSERT INTO stickies ({STICKIE_COLUMNS}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
            ),
            params![
                row.id,
                row.blackboard_id,
                row.topic_name,
                row.topic_role_name,
                row.note,
                row.code,
                labels,
                row.created_by_task_id,
                row.edit_count,
                row.priority_level,
                row.score,
                complex_name,
                row.archived,
                created,
                updated,
            ],
        )?;
        tracing::info!(id = %row.id, blackboard_id = %row.blackboard_id, "inserted stickie");
        Ok(row)
    }
}
