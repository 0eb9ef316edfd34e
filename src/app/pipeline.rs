//! Shared planning pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! source load -> parse -> index -> suggestions/forecast/windows/freshness -> chart
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use chrono::NaiveDate;

use crate::data::DataSource;
use crate::domain::{
    ChartData, DashboardSnapshot, ForecastResult, Freshness, PlannerConfig, SuggestionPoint,
    WindowSummary,
};
use crate::error::AppError;
use crate::io::ingest::{IngestedData, ingest_text};
use crate::plan::{evaluate_freshness, forecast_next_day, suggest_production, summarize_windows};
use crate::report::build_chart_data;

/// All computed outputs of a single load cycle.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub suggestions: Vec<SuggestionPoint>,
    pub forecast: ForecastResult,
    pub windows: WindowSummary,
    pub freshness: Freshness,
    pub chart: ChartData,
    pub today: NaiveDate,
}

impl RunOutput {
    pub fn latest_date(&self) -> NaiveDate {
        self.windows.reference
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            tool: "pizza".to_string(),
            today: self.today,
            latest_date: self.latest_date(),
            rows_read: self.ingest.rows_read,
            rows_used: self.ingest.rows_used,
            forecast: self.forecast.clone(),
            freshness: self.freshness,
            windows: self.windows.clone(),
            chart: self.chart.clone(),
        }
    }
}

/// Load the source and run the full pipeline.
pub fn run(source: &DataSource, config: &PlannerConfig, today: NaiveDate) -> Result<RunOutput, AppError> {
    let text = source.load()?;
    run_with_text(&text, config, today)
}

/// Run the pipeline over already-loaded CSV text.
///
/// This is useful for the TUI, where the text is kept between redraws, and for tests.
pub fn run_with_text(text: &str, config: &PlannerConfig, today: NaiveDate) -> Result<RunOutput, AppError> {
    let ingest = ingest_text(text, &config.columns)?;
    let index = &ingest.index;

    let latest = index.latest().ok_or_else(|| {
        AppError::no_data(format!(
            "No valid rows in the sheet ({} read, {} dropped). Check the `{}` column.",
            ingest.rows_read,
            ingest.dropped_rows(),
            config.columns.date
        ))
    })?;

    let suggestions = suggest_production(index, &config.rules);
    let forecast = forecast_next_day(index, &config.rules)
        .ok_or_else(|| AppError::no_data("Cannot forecast from an empty index."))?;
    let windows = summarize_windows(index)
        .ok_or_else(|| AppError::no_data("Cannot summarize an empty index."))?;
    let freshness = evaluate_freshness(latest, Some(&forecast), today);
    let chart = build_chart_data(index, &suggestions, Some(&forecast));

    Ok(RunOutput {
        ingest,
        suggestions,
        forecast,
        windows,
        freshness,
        chart,
        today,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "\
Fecha,Pizzas Vendidas,Pizzas Producidas,Partido,Feriado
2025-06-02,80,80,,
2025-06-09,90,95,,
2025-06-16,100,100,Argentina vs Chile,
2025-06-20,bad-row-is-fine,10,,
junk,1,1,,
2025-06-23,110,100,,
2025-06-30,60,,,Feriado puente
";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    #[test]
    fn full_run_over_sheet_text() {
        let run = run_with_text(SHEET, &PlannerConfig::default(), today()).unwrap();

        assert_eq!(run.ingest.index.len(), 6);
        assert_eq!(run.latest_date(), today());
        assert_eq!(run.suggestions.len(), 6);

        // Mondays 2025-06-02..23 sold 80, 90, 100, 110.
        assert_eq!(run.forecast.sample_count, 4);
        assert_eq!(run.forecast.predicted, Some(110));

        // Today's production is missing, so the card warns instead.
        assert_eq!(run.freshness, Freshness::Stale { days: 0 });

        assert_eq!(run.windows.last_7, 60);
        assert_eq!(run.windows.previous_week, 110);

        // The forecast point is appended after the daily suggestions.
        assert_eq!(run.chart.suggested.len(), 7);
        assert_eq!(run.chart.produced.len(), 5);
        assert_eq!(run.chart.markers.len(), 3);
    }

    #[test]
    fn dropped_rows_never_reach_any_series() {
        let run = run_with_text(SHEET, &PlannerConfig::default(), today()).unwrap();
        let dates: Vec<NaiveDate> = run.chart.sold.iter().map(|p| p.date).collect();
        assert_eq!(dates, run.ingest.index.dates());
        assert_eq!(run.ingest.dropped_rows(), 1);
    }

    #[test]
    fn sheet_without_valid_dates_is_an_error() {
        let err = run_with_text("Fecha,Pizzas Vendidas\nsoon,4\n", &PlannerConfig::default(), today())
            .unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn short_history_reports_insufficient_data() {
        let text = "Fecha,Pizzas Vendidas,Pizzas Producidas\n2025-06-29,10,10\n2025-06-30,10,10\n";
        let run = run_with_text(text, &PlannerConfig::default(), today()).unwrap();
        assert_eq!(run.forecast.predicted, None);
        assert_eq!(run.freshness, Freshness::InsufficientData);
        assert_eq!(run.chart.suggested.len(), 2);
    }
}
