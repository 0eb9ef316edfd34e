//! Export the daily series to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts:
//! one row per indexed day, plus a final `forecast` row when a forecast exists.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::app::pipeline::RunOutput;
use crate::error::AppError;

#[derive(Debug, Serialize)]
struct SeriesRow<'a> {
    date: NaiveDate,
    kind: &'static str,
    sold: Option<u32>,
    produced: Option<u32>,
    suggested: Option<u32>,
    event: &'a str,
    holiday: &'a str,
}

/// Write per-day results to a CSV file.
pub fn write_series_csv(path: &Path, run: &RunOutput) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_series(file, run)
}

fn write_series<W: std::io::Write>(out: W, run: &RunOutput) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);

    for (record, suggestion) in run.ingest.index.records().zip(&run.suggestions) {
        writer
            .serialize(SeriesRow {
                date: record.date,
                kind: "actual",
                sold: Some(record.sold),
                produced: record.produced,
                suggested: Some(suggestion.value),
                event: record.event.as_deref().unwrap_or(""),
                holiday: record.holiday.as_deref().unwrap_or(""),
            })
            .map_err(|e| AppError::usage(format!("Failed to write export CSV row: {e}")))?;
    }

    if let Some(value) = run.forecast.predicted {
        writer
            .serialize(SeriesRow {
                date: run.forecast.target_date,
                kind: "forecast",
                sold: None,
                produced: None,
                suggested: Some(value),
                event: "",
                holiday: "",
            })
            .map_err(|e| AppError::usage(format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::usage(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}
