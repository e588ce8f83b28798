//! Read-only access to an IPython `history.sqlite` store.

use crate::{IpyHistError, Result};
use ipyhist_types::{Cell, JoinedRecord};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;
use tracing::{debug, info, warn};

/// Columns the join reads from `history`.
pub const HISTORY_COLUMNS: &[&str] = &["session", "line", "source", "source_raw"];

/// Columns the join reads from `sessions`.
pub const SESSION_COLUMNS: &[&str] = &["session", "start", "end", "num_cmds"];

/// Projection order of the join.
const QUERY_COLUMNS: [&str; JoinedRecord::FIELD_COUNT] = [
    "session",
    "line",
    "start",
    "end",
    "num_cmds",
    "source",
    "source_raw",
];

/// Every history line with its session's metadata, ordered by session then line.
const JOINED_HISTORY_QUERY: &str = r#"
    SELECT history.session, history.line, sessions.start, sessions."end",
           sessions.num_cmds, history.source, history.source_raw
    FROM history
    LEFT JOIN sessions ON sessions.session = history.session
    ORDER BY history.session ASC, history.line ASC
"#;

/// A history database opened for reading.
pub struct HistoryStore {
    conn: Connection,
}

impl HistoryStore {
    /// Open the database read-only and immutable.
    ///
    /// SQLite neither writes to the file nor creates `-journal`, `-wal` or
    /// `-shm` files next to it, and ignores any existing `-wal`, so the rows
    /// read are exactly the bytes that were hashed.
    pub fn open(path: &Path) -> Result<Self> {
        let connection_error = |source| IpyHistError::Connection {
            path: path.to_path_buf(),
            source,
        };

        let conn = Connection::open_with_flags(
            immutable_uri(path),
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(connection_error)?;

        // SQLite opens lazily; touch the schema so corrupt files fail here.
        conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(connection_error)?;

        debug!(target: "ipyhist::extract", "Opened {}", path.display());
        Ok(Self { conn })
    }

    /// Require the tables and columns the join depends on.
    pub fn verify_schema(&self) -> Result<()> {
        self.require_columns("history", HISTORY_COLUMNS)?;
        self.require_columns("sessions", SESSION_COLUMNS)?;
        Ok(())
    }

    fn require_columns(&self, table: &str, required: &[&str]) -> Result<()> {
        let columns = self.table_columns(table)?;
        if columns.is_empty() {
            return Err(IpyHistError::Query(format!(
                "missing table `{}`, source data structure may have changed",
                table
            )));
        }

        for name in required {
            if !columns.iter().any(|c| c.eq_ignore_ascii_case(name)) {
                return Err(IpyHistError::Query(format!(
                    "missing column `{}.{}`, source data structure may have changed",
                    table, name
                )));
            }
        }
        Ok(())
    }

    /// Column names of `table`; empty when the table does not exist.
    fn table_columns(&self, table: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pragma_table_info(?1)")
            .map_err(query_error)?;
        let columns = stmt
            .query_map(params![table], |row| row.get::<_, String>(0))
            .map_err(query_error)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(query_error)?;
        Ok(columns)
    }

    /// Run the join and materialise every row.
    pub fn joined_history(&self) -> Result<Vec<JoinedRecord>> {
        let mut stmt = self.conn.prepare(JOINED_HISTORY_QUERY).map_err(query_error)?;
        let records = stmt
            .query_map([], Self::row_to_record)
            .map_err(query_error)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(query_error)?;
        Ok(records)
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<JoinedRecord> {
        Ok(JoinedRecord {
            session: cell_at(row, 0)?,
            line: cell_at(row, 1)?,
            start: cell_at(row, 2)?,
            end: cell_at(row, 3)?,
            num_cmds: cell_at(row, 4)?,
            source: cell_at(row, 5)?,
            source_raw: cell_at(row, 6)?,
        })
    }
}

/// Validate the schema and pull the full joined history from `path`.
///
/// The connection is closed before this returns.
pub fn extract(path: &Path) -> Result<Vec<JoinedRecord>> {
    let store = HistoryStore::open(path)?;
    store.verify_schema()?;
    let records = store.joined_history()?;

    let orphaned = records.iter().filter(|r| !r.has_session()).count();
    info!(
        target: "ipyhist::extract",
        "Extracted {} history lines ({} without a session row)",
        records.len(),
        orphaned
    );
    Ok(records)
}

/// `file:` URI for `path` with `mode=ro&immutable=1`.
fn immutable_uri(path: &Path) -> String {
    let mut uri = String::from("file:");
    for ch in path.to_string_lossy().chars() {
        match ch {
            '%' => uri.push_str("%25"),
            '?' => uri.push_str("%3f"),
            '#' => uri.push_str("%23"),
            _ => uri.push(ch),
        }
    }
    uri.push_str("?mode=ro&immutable=1");
    uri
}

fn cell_at(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Cell> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => Cell::Null,
        ValueRef::Integer(value) => Cell::Integer(value),
        ValueRef::Real(value) => Cell::Real(value),
        ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => Cell::Text(text.to_owned()),
            Err(e) => {
                // Keep the stored bytes untouched; the report renders them as hex.
                warn!(
                    target: "ipyhist::extract",
                    session = ?key_at(row, 0),
                    line = ?key_at(row, 1),
                    column = QUERY_COLUMNS.get(idx).copied().unwrap_or("?"),
                    "Text is not valid UTF-8 ({}), keeping raw bytes",
                    e
                );
                Cell::Blob(bytes.to_vec())
            }
        },
        ValueRef::Blob(bytes) => Cell::Blob(bytes.to_vec()),
    })
}

fn key_at(row: &rusqlite::Row, idx: usize) -> Option<i64> {
    row.get_ref(idx).ok().and_then(|value| value.as_i64().ok())
}

fn query_error(e: rusqlite::Error) -> IpyHistError {
    IpyHistError::Query(e.to_string())
}
