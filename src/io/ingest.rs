//! CSV ingest and normalization.
//!
//! This module turns the published sales sheet into a `DailyIndex`:
//!
//! 1. `parse_table` splits the text into header-keyed raw rows
//! 2. `build_index` types each row and keys it by date
//!
//! Design goals:
//! - **Lenient rows**: an unparseable date drops the row, missing optional
//!   fields take defaults, nothing here is fatal
//! - **Report what happened**: every dropped or patched row is kept as a `RowIssue`
//! - **Separation of concerns**: no planning logic here

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use log::{debug, info, warn};

use crate::domain::{ColumnNames, DailyIndex, DailyRecord};
use crate::error::AppError;

/// One data line of the sheet, keyed by (normalized) header name.
#[derive(Debug, Clone)]
pub struct RawRow {
    /// 1-based line number in the source text.
    pub line: usize,
    fields: HashMap<String, String>,
}

impl RawRow {
    /// Trimmed value of column `name`, or `""` when the column or value is missing.
    pub fn get(&self, name: &str) -> &str {
        self.fields
            .get(&normalize_header_name(name))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// A row-level problem encountered during ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIssue {
    pub line: usize,
    pub message: String,
    /// True when the row was left out of the index.
    pub dropped: bool,
}

/// Ingest output: the index plus bookkeeping about the rows.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub index: DailyIndex,
    pub row_issues: Vec<RowIssue>,
    pub rows_read: usize,
    pub rows_used: usize,
}

impl IngestedData {
    pub fn dropped_rows(&self) -> usize {
        self.row_issues.iter().filter(|i| i.dropped).count()
    }
}

/// Read a local CSV export into memory.
pub fn read_csv_file(path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path)
        .map_err(|e| AppError::usage(format!("Failed to read CSV '{}': {e}", path.display())))
}

/// Parse and index CSV text in one step.
pub fn ingest_text(text: &str, columns: &ColumnNames) -> Result<IngestedData, AppError> {
    let rows = parse_table(text)?;
    Ok(build_index(&rows, columns))
}

/// Split CSV text into raw rows.
///
/// The first line holds the column names. Values are mapped to names by
/// position and trimmed; missing trailing values become `""`. Quoting is
/// disabled on purpose: every comma is a separator, so a value containing a
/// comma is not supported.
pub fn parse_table(text: &str) -> Result<Vec<RawRow>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .quoting(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::usage(format!("Failed to read CSV headers: {e}")))?
        .iter()
        .map(normalize_header_name)
        .collect();

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                // Only malformed UTF-8 can land here since quoting is off.
                debug!("skipping unreadable CSV record #{}: {e}", idx + 1);
                continue;
            }
        };

        // `Position::line` undercounts on CRLF input, so count `\n` up to the record start.
        let line = record
            .position()
            .map(|p| line_at(text, p.byte()))
            .unwrap_or(idx + 2);

        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();

        rows.push(RawRow { line, fields });
    }

    Ok(rows)
}

/// 1-based line number of byte offset `byte` in `text`.
fn line_at(text: &str, byte: u64) -> usize {
    let end = usize::try_from(byte).unwrap_or(usize::MAX).min(text.len());
    text.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

/// Type the raw rows and key them by date.
///
/// Rows whose date does not parse are dropped. Blank `sold` counts as 0,
/// blank `produced` is unknown, blank tags mean "not tagged". If a date
/// repeats, the last row wins.
pub fn build_index(rows: &[RawRow], columns: &ColumnNames) -> IngestedData {
    let mut records = Vec::with_capacity(rows.len());
    let mut row_issues = Vec::new();

    for row in rows {
        match parse_row(row, columns) {
            Ok((record, issue)) => {
                if let Some(message) = issue {
                    warn!("line {}: {message}", row.line);
                    row_issues.push(RowIssue {
                        line: row.line,
                        message,
                        dropped: false,
                    });
                }
                records.push(record);
            }
            Err(message) => {
                debug!("line {}: dropped ({message})", row.line);
                row_issues.push(RowIssue {
                    line: row.line,
                    message,
                    dropped: true,
                });
            }
        }
    }

    let rows_used = records.len();
    let index = DailyIndex::from_records(records);
    info!(
        "ingested {} rows: {} used, {} distinct dates",
        rows.len(),
        rows_used,
        index.len()
    );

    IngestedData {
        index,
        row_issues,
        rows_read: rows.len(),
        rows_used,
    }
}

/// Returns the record plus an optional non-fatal note, or the reason to drop the row.
fn parse_row(row: &RawRow, columns: &ColumnNames) -> Result<(DailyRecord, Option<String>), String> {
    let date = parse_date(row.get(&columns.date))?;

    let mut issue = None;
    let sold_raw = row.get(&columns.sold);
    let sold = if sold_raw.is_empty() {
        0
    } else {
        match parse_count(sold_raw) {
            Some(v) => v,
            None => {
                issue = Some(format!("Invalid sold count '{sold_raw}', using 0."));
                0
            }
        }
    };

    let produced_raw = row.get(&columns.produced);
    let produced = if produced_raw.is_empty() {
        None
    } else {
        parse_count(produced_raw)
    };

    Ok((
        DailyRecord {
            date,
            sold,
            produced,
            event: parse_tag(row.get(&columns.event)),
            holiday: parse_tag(row.get(&columns.holiday)),
        },
        issue,
    ))
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a BOM.
    let name = name.trim().trim_start_matches('\u{feff}').trim();
    name.to_lowercase()
}

const MIN_YEAR: i32 = 1900;

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    if s.is_empty() {
        return Err("Missing date.".to_string());
    }
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y"];
    for fmt in FMTS {
        // `%Y` also takes two-digit years, which are not real sheet dates.
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            if d.year() >= MIN_YEAR {
                return Ok(d);
            }
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, DD/MM/YYYY, YYYY/MM/DD, DD-MM-YYYY."
    ))
}

/// Non-negative integer count. Sheets sometimes export `12.0`, which is accepted.
fn parse_count(s: &str) -> Option<u32> {
    if let Ok(v) = s.parse::<u32>() {
        return Some(v);
    }
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() && v >= 0.0 && v <= u32::MAX as f64 {
        Some(v.trunc() as u32)
    } else {
        None
    }
}

fn parse_tag(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() { None } else { Some(s.to_string()) }
}
