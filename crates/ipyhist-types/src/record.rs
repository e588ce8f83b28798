//! Records read from an IPython `history.sqlite` database.

use crate::Cell;
use serde::{Deserialize, Serialize};

/// One row of the `sessions` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Session number (unique key).
    pub session: i64,
    /// When the console session started.
    pub start: Cell,
    /// When the console session ended; null while still open.
    pub end: Cell,
    /// Number of commands entered in the session.
    pub num_cmds: Cell,
}

/// One row of the `history` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Session the line belongs to. Not guaranteed to exist in `sessions`.
    pub session: i64,
    /// Input line number within the session.
    pub line: i64,
    /// Source after input transformation.
    pub source: Cell,
    /// Source exactly as typed.
    pub source_raw: Cell,
}

/// A history line joined with its session's metadata.
///
/// Produced by a left join driven from the history side: when no session row
/// matches, `start`, `end` and `num_cmds` are null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRecord {
    pub session: Cell,
    pub line: Cell,
    pub start: Cell,
    pub end: Cell,
    pub num_cmds: Cell,
    pub source: Cell,
    pub source_raw: Cell,
}

impl JoinedRecord {
    /// Number of fields in a joined record.
    pub const FIELD_COUNT: usize = 7;

    /// Join a history row with its session, if one was found.
    pub fn from_parts(history: &HistoryRecord, session: Option<&SessionRecord>) -> Self {
        let (start, end, num_cmds) = match session {
            Some(s) => (s.start.clone(), s.end.clone(), s.num_cmds.clone()),
            None => (Cell::Null, Cell::Null, Cell::Null),
        };
        Self {
            session: Cell::Integer(history.session),
            line: Cell::Integer(history.line),
            start,
            end,
            num_cmds,
            source: history.source.clone(),
            source_raw: history.source_raw.clone(),
        }
    }

    /// Whether the history row found a matching session.
    pub fn has_session(&self) -> bool {
        !(self.start.is_null() && self.end.is_null() && self.num_cmds.is_null())
    }

    /// Flatten into report column order.
    pub fn cells(&self) -> Vec<Cell> {
        vec![
            self.session.clone(),
            self.line.clone(),
            self.start.clone(),
            self.end.clone(),
            self.num_cmds.clone(),
            self.source.clone(),
            self.source_raw.clone(),
        ]
    }
}
