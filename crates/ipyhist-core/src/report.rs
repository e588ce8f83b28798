//! Two-sheet `.xlsx` report for reviewers.
//!
//! "Console Logs" holds a header row plus one row per joined record, in the
//! order given. "Notes" holds the provenance note and the artifact digests.
//! A record that cannot be written is skipped on its own; only failure to
//! create or save the workbook aborts the run.

use crate::{IpyHistError, Result, TOOL_NAME};
use chrono::{DateTime, SecondsFormat, Utc};
use ipyhist_types::{ArtifactDigests, Cell, JoinedRecord};
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet, XlsxError};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Fixed report file name inside the output directory.
pub const REPORT_FILE_NAME: &str = "iPython_report.xlsx";

pub const LOGS_SHEET: &str = "Console Logs";
pub const NOTES_SHEET: &str = "Notes";

/// Header row of the "Console Logs" sheet.
pub const HEADINGS: [&str; JoinedRecord::FIELD_COUNT] = [
    "Session No",
    "Line ID",
    "Start Time",
    "End Time",
    "CMD Total",
    "Source Data",
    "Source RAW Data",
];

/// Longest string a single spreadsheet cell can hold.
pub const MAX_CELL_TEXT: usize = 32_767;

/// Largest magnitude an `f64` sheet number holds without rounding.
pub const MAX_EXACT_INTEGER: i64 = 1 << 53;

/// Why a record was left out of the report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipReason {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("`{column}` holds {length} characters, over the 32767 cell limit")]
    TextTooLong { column: &'static str, length: usize },

    #[error("write failed: {0}")]
    Write(String),
}

/// A record dropped from the report. Recoverable: the run continues.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("record {index} skipped: {reason}")]
pub struct RecordSkipped {
    /// Position of the record in the input sequence.
    pub index: usize,
    pub reason: SkipReason,
}

/// Outcome of a finished report.
#[derive(Debug, Clone)]
pub struct ReportSummary {
    /// Where the workbook was written.
    pub path: PathBuf,
    /// Data rows on "Console Logs", header excluded.
    pub rows_written: u32,
    pub skipped: Vec<RecordSkipped>,
}

impl ReportSummary {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Builds the report workbook in memory.
pub struct ReportBuilder {
    logs: Worksheet,
    notes: Worksheet,
    bold: Format,
    next_row: RowNum,
    next_note_row: RowNum,
    records_seen: usize,
    skipped: Vec<RecordSkipped>,
}

impl ReportBuilder {
    /// Start a report with both sheets, the header row and the version note.
    pub fn new(version: &str) -> Result<Self> {
        Self::build(version).map_err(|e| IpyHistError::report(REPORT_FILE_NAME, e))
    }

    fn build(version: &str) -> std::result::Result<Self, XlsxError> {
        let bold = Format::new().set_bold().set_font_size(12);

        let mut logs = Worksheet::new();
        logs.set_name(LOGS_SHEET)?;
        logs.set_column_width(0, 11)?;
        logs.set_column_width(1, 11)?;
        logs.set_column_width(2, 25)?;
        logs.set_column_width(3, 25)?;
        logs.set_column_width(4, 11)?;
        logs.set_column_width(5, 75)?;
        logs.set_column_width(6, 75)?;
        for (col, heading) in HEADINGS.iter().enumerate() {
            logs.write_string_with_format(0, col as ColNum, *heading, &bold)?;
        }

        let mut notes = Worksheet::new();
        notes.set_name(NOTES_SHEET)?;
        notes.set_column_width(0, 50)?;
        notes.write_string_with_format(0, 0, "Notes", &bold)?;
        notes.write_string(
            2,
            0,
            format!("This report was generated utilising {} {}.", TOOL_NAME, version),
        )?;

        Ok(Self {
            logs,
            notes,
            bold,
            next_row: 1,
            next_note_row: 4,
            records_seen: 0,
            skipped: Vec::new(),
        })
    }

    /// Add the artifact's provenance below the version note.
    pub fn write_provenance(
        &mut self,
        source: &Path,
        digests: &ArtifactDigests,
        generated_at: DateTime<Utc>,
    ) -> Result<()> {
        let entries = [
            ("Source artifact", source.display().to_string()),
            ("Size (bytes)", digests.byte_count.to_string()),
            ("MD5", digests.md5.clone()),
            ("SHA1", digests.sha1.clone()),
            (
                "Generated (UTC)",
                generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
        ];

        for (label, value) in entries {
            let row = self.next_note_row;
            self.notes
                .write_string_with_format(row, 0, label, &self.bold)
                .and_then(|sheet| sheet.write_string(row, 1, value))
                .map_err(|e| IpyHistError::report(REPORT_FILE_NAME, e))?;
            self.next_note_row += 1;
        }
        Ok(())
    }

    /// Write joined records in order.
    pub fn write_records(&mut self, records: &[JoinedRecord]) {
        self.write_rows(records.iter().map(JoinedRecord::cells));
    }

    /// Write raw rows in order, isolating failures to the row that caused them.
    pub fn write_rows<I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = Vec<Cell>>,
    {
        for cells in rows {
            let index = self.records_seen;
            self.records_seen += 1;

            if let Err(reason) = self.write_row(&cells) {
                let skipped = RecordSkipped { index, reason };
                warn!(target: "ipyhist::report", "{}", skipped);
                self.skipped.push(skipped);
            }
        }
    }

    /// Skipped so far.
    pub fn skipped(&self) -> &[RecordSkipped] {
        &self.skipped
    }

    fn write_row(&mut self, cells: &[Cell]) -> std::result::Result<(), SkipReason> {
        check_row(cells)?;

        let row = self.next_row;
        for (col, cell) in cells.iter().enumerate() {
            if let Err(e) = write_cell(&mut self.logs, row, col as ColNum, cell) {
                for written in 0..=col {
                    self.logs.clear_cell(row, written as ColNum);
                }
                return Err(SkipReason::Write(e.to_string()));
            }
        }

        self.next_row += 1;
        Ok(())
    }

    /// Serialise the workbook and move it into `output_dir` in one step.
    ///
    /// The bytes land in a temporary file in the same directory first, so a
    /// failure never leaves a partial report behind.
    pub fn finish(self, output_dir: &Path) -> Result<ReportSummary> {
        let path = output_dir.join(REPORT_FILE_NAME);
        let report_error = |e: &dyn std::fmt::Display| IpyHistError::report(&path, e);

        let mut workbook = Workbook::new();
        workbook.push_worksheet(self.logs);
        workbook.push_worksheet(self.notes);
        let buffer = workbook.save_to_buffer().map_err(|e| report_error(&e))?;

        let mut temp = tempfile::Builder::new()
            .prefix(".ipyhist-")
            .suffix(".xlsx.tmp")
            .tempfile_in(output_dir)
            .map_err(|e| report_error(&e))?;
        temp.write_all(&buffer).map_err(|e| report_error(&e))?;
        temp.as_file().sync_all().map_err(|e| report_error(&e))?;
        temp.persist(&path).map_err(|e| report_error(&e.error))?;

        let rows_written = self.next_row - 1;
        info!(
            target: "ipyhist::report",
            "Wrote {} rows to {} ({} skipped)",
            rows_written,
            path.display(),
            self.skipped.len()
        );

        Ok(ReportSummary {
            path,
            rows_written,
            skipped: self.skipped,
        })
    }
}

fn check_row(cells: &[Cell]) -> std::result::Result<(), SkipReason> {
    if cells.len() != HEADINGS.len() {
        return Err(SkipReason::FieldCount {
            expected: HEADINGS.len(),
            found: cells.len(),
        });
    }

    for (cell, column) in cells.iter().zip(HEADINGS) {
        let length = match cell {
            Cell::Text(text) => text.chars().count(),
            Cell::Blob(bytes) => bytes.len() * 2,
            _ => continue,
        };
        if length > MAX_CELL_TEXT {
            return Err(SkipReason::TextTooLong { column, length });
        }
    }
    Ok(())
}

fn write_cell(
    sheet: &mut Worksheet,
    row: RowNum,
    col: ColNum,
    cell: &Cell,
) -> std::result::Result<(), XlsxError> {
    match cell {
        Cell::Null => {}
        // Sheets store numbers as f64; wider integers go in as text.
        Cell::Integer(value) if value.unsigned_abs() <= MAX_EXACT_INTEGER as u64 => {
            sheet.write_number(row, col, *value as f64)?;
        }
        Cell::Integer(_) => {
            sheet.write_string(row, col, cell.to_string())?;
        }
        Cell::Real(value) if value.is_finite() => {
            sheet.write_number(row, col, *value)?;
        }
        Cell::Real(_) => {
            sheet.write_string(row, col, cell.to_string())?;
        }
        Cell::Text(text) => {
            sheet.write_string(row, col, text.as_str())?;
        }
        Cell::Blob(_) => {
            sheet.write_string(row, col, cell.to_string())?;
        }
    }
    Ok(())
}
