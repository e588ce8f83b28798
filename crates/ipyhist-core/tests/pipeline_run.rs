//! Full runs from artifact to report.

mod common;

use common::{create_two_session_db, read_sheet, text};
use ipyhist_core::report::{LOGS_SHEET, REPORT_FILE_NAME};
use ipyhist_core::{digest, run, IpyHistError, RunConfig};
use tempfile::TempDir;

#[test]
fn test_two_session_scenario() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let db = create_two_session_db(input.path());

    let summary = run(&RunConfig::new(&db, output.path())).unwrap();

    assert_eq!(summary.records_extracted, 3);
    assert_eq!(summary.report.rows_written, 3);
    assert_eq!(summary.report.skipped_count(), 0);

    let bytes = std::fs::read(&db).unwrap();
    assert_eq!(summary.digests, digest::compute(&bytes));

    let sheet = read_sheet(&output.path().join(REPORT_FILE_NAME), LOGS_SHEET);
    assert_eq!(sheet.height(), 4);

    let keys: Vec<(String, String, String)> = sheet
        .rows()
        .skip(1)
        .map(|r| (text(&r[0]), text(&r[1]), text(&r[4])))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("1".into(), "1".into(), "3".into()),
            ("1".into(), "2".into(), "3".into()),
            ("2".into(), "1".into(), "1".into()),
        ]
    );
}

#[test]
fn test_non_sqlite_input_stops_before_report() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let path = input.path().join("history.sqlite");
    std::fs::write(&path, b"{\"not\": \"a database\", \"padding\": 0}").unwrap();

    let err = run(&RunConfig::new(&path, output.path())).unwrap_err();

    assert!(matches!(err, IpyHistError::Format { .. }));
    assert_eq!(err.exit_code(), 3);
    assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 0);
}

#[test]
fn test_schema_drift_stops_before_report() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let path = input.path().join("history.sqlite");
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute_batch("CREATE TABLE unrelated (id integer);").unwrap();
    drop(conn);

    let err = run(&RunConfig::new(&path, output.path())).unwrap_err();

    assert!(matches!(err, IpyHistError::Query(_)));
    assert_eq!(err.exit_code(), 5);
    assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 0);
}

#[test]
fn test_missing_output_directory_is_report_error() {
    let input = TempDir::new().unwrap();
    let db = create_two_session_db(input.path());
    let missing = input.path().join("no-such-dir");

    let err = run(&RunConfig::new(&db, &missing)).unwrap_err();

    assert!(matches!(err, IpyHistError::ReportGeneration { .. }));
    assert_eq!(err.exit_code(), 6);
    assert!(!missing.exists());
}

#[test]
fn test_wal_mode_artifact_directory_is_left_untouched() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let db = create_two_session_db(input.path());
    let conn = rusqlite::Connection::open(&db).unwrap();
    let mode: String = conn
        .query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))
        .unwrap();
    assert_eq!(mode, "wal");
    drop(conn);

    let listing = |dir: &std::path::Path| {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    };
    let before = listing(input.path());
    let bytes_before = std::fs::read(&db).unwrap();

    let summary = run(&RunConfig::new(&db, output.path())).unwrap();

    assert_eq!(summary.records_extracted, 3);
    assert_eq!(listing(input.path()), before);
    assert_eq!(before, vec!["history.sqlite"]);
    assert_eq!(std::fs::read(&db).unwrap(), bytes_before);
    assert_eq!(listing(output.path()), vec![REPORT_FILE_NAME]);
}
