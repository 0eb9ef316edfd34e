//! Formatted terminal output: summary panels, forecast card, row issues.
//!
//! We keep formatting code in one place so:
//! - the planning code stays clean and testable
//! - output changes are localized

use crate::app::pipeline::RunOutput;
use crate::domain::{Freshness, Trend, WindowSummary};
use crate::io::ingest::RowIssue;

/// Format the full run summary (dataset stats + panels + forecast card).
pub fn format_run_summary(run: &RunOutput, source: &str) -> String {
    let mut out = String::new();

    out.push_str("=== pizza - production planner ===\n");
    out.push_str(&format!("Source: {source}\n"));
    out.push_str(&format!(
        "Rows: read={} used={} dropped={} | days={} | {} → {}\n",
        run.ingest.rows_read,
        run.ingest.rows_used,
        run.ingest.dropped_rows(),
        run.ingest.index.len(),
        run.ingest
            .index
            .first_date()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string()),
        run.latest_date(),
    ));
    out.push_str(&format!("Today: {}\n", run.today));

    out.push_str("\nForecast:\n");
    out.push_str(&format!("  {}\n", format_forecast_card(&run.freshness)));
    match run.forecast.predicted {
        Some(v) => {
            let basis = if run.forecast.used_fallback {
                "fallback average".to_string()
            } else {
                format!("{} same-weekday day(s)", run.forecast.sample_count)
            };
            out.push_str(&format!(
                "  next day {}: {v} (avg {:.1} from {basis})\n",
                run.forecast.target_date, run.forecast.average
            ));
        }
        None => out.push_str(&format!(
            "  next day {}: -\n",
            run.forecast.target_date
        )),
    }

    out.push_str("\nSales:\n");
    out.push_str(&format_windows(&run.windows));

    out
}

/// Text of the forecast card.
pub fn format_forecast_card(freshness: &Freshness) -> String {
    match *freshness {
        Freshness::InsufficientData => "Not enough data to forecast".to_string(),
        Freshness::Fresh { forecast } => format!("Suggested production: {forecast}"),
        Freshness::Stale { days } => format!(
            "No production recorded for {days} day{}",
            if days == 1 { "" } else { "s" }
        ),
        Freshness::FutureDated { days_ahead } => format!(
            "Latest row is dated {days_ahead} day{} in the future",
            if days_ahead == 1 { "" } else { "s" }
        ),
    }
}

/// Week-over-week line, e.g. `▲ 12 vs previous 7 days`.
pub fn format_trend(windows: &WindowSummary) -> String {
    let arrow = match windows.trend {
        Trend::Up => '▲',
        Trend::Down => '▼',
    };
    format!("{arrow} {} vs previous 7 days", windows.delta.unsigned_abs())
}

fn format_windows(windows: &WindowSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("  last 7 days : {:>6}\n", windows.last_7));
    out.push_str(&format!("  last 30 days: {:>6}\n", windows.last_30));
    out.push_str(&format!(
        "  this week   : {:>6} | previous: {:>6} | {}\n",
        windows.this_week,
        windows.previous_week,
        format_trend(windows)
    ));
    out
}

/// List row-level problems (dropped rows first).
pub fn format_row_issues(issues: &[RowIssue]) -> String {
    let mut out = String::new();
    if issues.is_empty() {
        return out;
    }
    out.push_str(&format!("Row issues ({}):\n", issues.len()));
    let mut sorted: Vec<&RowIssue> = issues.iter().collect();
    sorted.sort_by_key(|i| (!i.dropped, i.line));
    for issue in sorted {
        let tag = if issue.dropped { "dropped" } else { "patched" };
        out.push_str(&format!("  line {:>4} [{tag}] {}\n", issue.line, issue.message));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn windows(delta: i64) -> WindowSummary {
        WindowSummary {
            reference: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            last_7: 70,
            last_30: 300,
            this_week: 70,
            previous_week: (70 - delta) as u64,
            delta,
            trend: if delta >= 0 { Trend::Up } else { Trend::Down },
        }
    }

    #[test]
    fn forecast_card_texts() {
        assert_eq!(
            format_forecast_card(&Freshness::Fresh { forecast: 110 }),
            "Suggested production: 110"
        );
        assert_eq!(
            format_forecast_card(&Freshness::Stale { days: 1 }),
            "No production recorded for 1 day"
        );
        assert_eq!(
            format_forecast_card(&Freshness::Stale { days: 0 }),
            "No production recorded for 0 days"
        );
        assert_eq!(
            format_forecast_card(&Freshness::InsufficientData),
            "Not enough data to forecast"
        );
    }

    #[test]
    fn trend_uses_absolute_delta() {
        assert_eq!(format_trend(&windows(-14)), "▼ 14 vs previous 7 days");
        assert_eq!(format_trend(&windows(0)), "▲ 0 vs previous 7 days");
    }

    #[test]
    fn row_issues_list_dropped_first() {
        let issues = vec![
            RowIssue { line: 3, message: "Invalid sold count 'x', using 0.".to_string(), dropped: false },
            RowIssue { line: 9, message: "Missing date.".to_string(), dropped: true },
        ];
        let txt = format_row_issues(&issues);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[0], "Row issues (2):");
        assert!(lines[1].contains("[dropped]"));
        assert!(lines[2].contains("[patched]"));
        assert!(format_row_issues(&[]).is_empty());
    }
}
