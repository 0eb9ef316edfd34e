//! Read/write dashboard JSON files.
//!
//! A snapshot is the "portable" representation of one load cycle:
//! - run metadata (today, latest date, row counts)
//! - forecast, freshness and window totals
//! - the chart series and markers
//!
//! The schema is defined by `domain::DashboardSnapshot`.

use std::fs::File;
use std::path::Path;

use crate::domain::DashboardSnapshot;
use crate::error::AppError;

/// Write a dashboard JSON file.
pub fn write_snapshot_json(path: &Path, snapshot: &DashboardSnapshot) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create snapshot JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, snapshot)
        .map_err(|e| AppError::usage(format!("Failed to write snapshot JSON: {e}")))?;

    Ok(())
}

/// Read a dashboard JSON file.
pub fn read_snapshot_json(path: &Path) -> Result<DashboardSnapshot, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::usage(format!("Failed to open snapshot JSON '{}': {e}", path.display())))?;
    let snapshot: DashboardSnapshot = serde_json::from_reader(file)
        .map_err(|e| AppError::usage(format!("Invalid snapshot JSON: {e}")))?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::app::pipeline::run_with_text;
    use crate::domain::{Freshness, PlannerConfig};

    #[test]
    fn freshness_serializes_with_state_tag() {
        let json = serde_json::to_value(Freshness::Stale { days: 3 }).unwrap();
        assert_eq!(json["state"], "stale");
        assert_eq!(json["days"], 3);

        let json = serde_json::to_value(Freshness::InsufficientData).unwrap();
        assert_eq!(json["state"], "insufficient_data");
    }

    #[test]
    fn snapshot_json_carries_series_and_panels() {
        let text = "Fecha,Pizzas Vendidas,Pizzas Producidas\n2025-06-29,10,8\n2025-06-30,12,12\n";
        let today = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let run = run_with_text(text, &PlannerConfig::default(), today).unwrap();

        let json = serde_json::to_value(run.snapshot()).unwrap();
        assert_eq!(json["latest_date"], "2025-06-30");
        assert_eq!(json["windows"]["last_7"], 22);
        assert_eq!(json["chart"]["sold"].as_array().unwrap().len(), 2);
        assert_eq!(json["chart"]["markers"][0]["kind"], "shortage");
        assert!(json["forecast"]["predicted"].is_null());
    }

    #[test]
    fn written_snapshot_reads_back() {
        let text = "\
Fecha,Pizzas Vendidas,Pizzas Producidas,Partido,Feriado
2025-06-02,80,80,,
2025-06-09,90,95,,
2025-06-16,100,100,Final,
2025-06-23,110,100,,
2025-06-30,60,60,,Feriado
";
        let today = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let run = run_with_text(text, &PlannerConfig::default(), today).unwrap();

        let path = std::env::temp_dir().join(format!("pizza-snapshot-{}.json", std::process::id()));
        write_snapshot_json(&path, &run.snapshot()).unwrap();
        let back = read_snapshot_json(&path);
        let _ = std::fs::remove_file(&path);
        let back = back.unwrap();

        assert_eq!(back.latest_date, run.latest_date());
        assert_eq!(back.forecast, run.forecast);
        assert_eq!(back.freshness, Freshness::Fresh { forecast: 110 });
        assert_eq!(back.windows, run.windows);
        assert_eq!(back.chart, run.chart);
    }

    #[test]
    fn missing_snapshot_is_a_usage_error() {
        let err = read_snapshot_json(Path::new("does/not/exist.json")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
