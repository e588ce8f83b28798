//! Common test utilities for integration tests.

#![allow(dead_code)]

use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use ipyhist_types::{Cell, HistoryRecord, JoinedRecord, SessionRecord};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

/// Schema IPython creates for `history.sqlite`.
pub const IPYTHON_SCHEMA: &str = r#"
    CREATE TABLE sessions (session integer primary key autoincrement, start timestamp,
                end timestamp, num_cmds integer, remark text);
    CREATE TABLE history
                (session integer, line integer, source text, source_raw text,
                PRIMARY KEY (session, line));
    CREATE TABLE output_history
                (session integer, line integer, output text,
                PRIMARY KEY (session, line));
"#;

pub fn session(id: i64, num_cmds: i64) -> SessionRecord {
    SessionRecord {
        session: id,
        start: Cell::Text(format!("2019-06-0{} 09:00:00.000000", id)),
        end: Cell::Text(format!("2019-06-0{} 17:30:00.000000", id)),
        num_cmds: Cell::Integer(num_cmds),
    }
}

pub fn line(session: i64, line: i64, source: &str) -> HistoryRecord {
    HistoryRecord {
        session,
        line,
        source: Cell::from(source),
        source_raw: Cell::Text(format!("{}  ", source)),
    }
}

/// Write a `history.sqlite` fixture into `dir` and return its path.
pub fn create_history_db(
    dir: &Path,
    sessions: &[SessionRecord],
    history: &[HistoryRecord],
) -> PathBuf {
    let path = dir.join("history.sqlite");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(IPYTHON_SCHEMA).unwrap();

    for s in sessions {
        conn.execute(
            "INSERT INTO sessions (session, start, end, num_cmds, remark) VALUES (?1, ?2, ?3, ?4, NULL)",
            params![s.session, cell_param(&s.start), cell_param(&s.end), cell_param(&s.num_cmds)],
        )
        .unwrap();
    }
    for h in history {
        conn.execute(
            "INSERT INTO history (session, line, source, source_raw) VALUES (?1, ?2, ?3, ?4)",
            params![h.session, h.line, cell_param(&h.source), cell_param(&h.source_raw)],
        )
        .unwrap();
    }
    drop(conn);
    path
}

/// The rows a left join of `history` onto `sessions` should yield, in
/// session then line order.
pub fn expected_join(sessions: &[SessionRecord], history: &[HistoryRecord]) -> Vec<JoinedRecord> {
    let mut lines: Vec<&HistoryRecord> = history.iter().collect();
    lines.sort_by_key(|h| (h.session, h.line));
    lines
        .into_iter()
        .map(|h| JoinedRecord::from_parts(h, sessions.iter().find(|s| s.session == h.session)))
        .collect()
}

/// The two-session scenario: sessions 1 and 2, three history lines.
pub fn create_two_session_db(dir: &Path) -> PathBuf {
    create_history_db(
        dir,
        &[session(1, 3), session(2, 1)],
        &[
            line(2, 1, "print('two')"),
            line(1, 2, "b = a + 1"),
            line(1, 1, "a = 1"),
        ],
    )
}

fn cell_param(cell: &Cell) -> rusqlite::types::Value {
    use rusqlite::types::Value;
    match cell {
        Cell::Null => Value::Null,
        Cell::Integer(v) => Value::Integer(*v),
        Cell::Real(v) => Value::Real(*v),
        Cell::Text(v) => Value::Text(v.clone()),
        Cell::Blob(v) => Value::Blob(v.clone()),
    }
}

/// Load one sheet of a generated report.
pub fn read_sheet(path: &Path, sheet: &str) -> Range<Data> {
    let mut workbook: Xlsx<_> = open_workbook(path)
        .unwrap_or_else(|e| panic!("Failed to open report {}: {}", path.display(), e));
    workbook
        .worksheet_range(sheet)
        .unwrap_or_else(|e| panic!("Failed to read sheet {}: {}", sheet, e))
}

pub fn sheet_names(path: &Path) -> Vec<String> {
    let workbook: Xlsx<_> = open_workbook(path).unwrap();
    workbook.sheet_names()
}

/// Render a sheet cell the way the report wrote it.
pub fn text(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        other => other.to_string(),
    }
}
