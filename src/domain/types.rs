//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory by the planning engines
//! - exported to JSON/CSV
//! - handed to a chart front-end without further conversion

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar day of sales and production.
///
/// `produced` is `None` when the sheet has no production figure for the day.
/// That is not the same as zero: a day with unknown production is never
/// considered fresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub sold: u32,
    pub produced: Option<u32>,
    /// Sports event on this day (free text, e.g. the match name).
    pub event: Option<String>,
    /// Public holiday on this day (free text).
    pub holiday: Option<String>,
}

impl DailyRecord {
    pub fn has_event(&self) -> bool {
        self.event.as_deref().is_some_and(|s| !s.is_empty())
    }

    pub fn has_holiday(&self) -> bool {
        self.holiday.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// True when production is known and fell short of sales.
    pub fn is_shortage(&self) -> bool {
        self.produced.is_some_and(|p| self.sold > p)
    }
}

/// A single `(date, value)` sample of a daily series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: u32,
}

/// Recommended production for one day.
pub type SuggestionPoint = SeriesPoint;

/// Next-day production estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// `None` when there is not enough history to forecast at all.
    pub predicted: Option<u32>,
    /// Number of same-weekday days found in the lookback window.
    pub sample_count: usize,
    /// Average sales the prediction was built from.
    pub average: f64,
    /// True when no same-weekday sample existed and the fallback average was used.
    pub used_fallback: bool,
    /// Day the forecast is for (`latest + 1`).
    pub target_date: NaiveDate,
}

/// Marker category shown on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Shortage,
    Event,
    Holiday,
}


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub date: NaiveDate,
    pub kind: MarkerKind,
    pub label: String,
}

/// Direction of the week-over-week change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

/// Trailing-window sales totals for the summary panels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSummary {
    pub reference: NaiveDate,
    pub last_7: u64,
    pub last_30: u64,
    pub this_week: u64,
    pub previous_week: u64,
    pub delta: i64,
    pub trend: Trend,
}

/// What the forecast card should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Freshness {
    /// Fewer days of history than the forecast needs.
    InsufficientData,
    /// Today's row is in and has a production figure.
    Fresh { forecast: u32 },
    /// Production has not been recorded for `days` days.
    Stale { days: i64 },
    /// The latest row is dated after today.
    FutureDated { days_ahead: i64 },
}

/// Header names of the input columns (display names, matched case-insensitively).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNames {
    pub date: String,
    pub sold: String,
    pub produced: String,
    pub event: String,
    pub holiday: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            date: "Fecha".to_string(),
            sold: "Pizzas Vendidas".to_string(),
            produced: "Pizzas Producidas".to_string(),
            event: "Partido".to_string(),
            holiday: "Feriado".to_string(),
        }
    }
}

/// Constants of the production heuristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRules {
    /// Added to sales, and again for each special-day flag.
    pub increment: u32,
    /// How many prior same-weekday occurrences the forecast looks at.
    pub lookback_weeks: u32,
    /// Minimum distinct dates before any forecast is produced.
    pub min_history_days: usize,
    /// Average used when the lookback finds no same-weekday sample.
    pub fallback_average: f64,
}

impl Default for PlanRules {
    fn default() -> Self {
        Self {
            increment: 15,
            lookback_weeks: 4,
            min_history_days: 5,
            fallback_average: 100.0,
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone, Default)]
pub struct PlannerConfig {
    pub columns: ColumnNames,
    pub rules: PlanRules,
}

/// Everything a chart front-end needs: three daily series and the markers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartData {
    pub sold: Vec<SeriesPoint>,
    /// Days with unknown production are absent rather than drawn as zero.
    pub produced: Vec<SeriesPoint>,
    /// Per-day suggestions, followed by the forecast point when there is one.
    pub suggested: Vec<SeriesPoint>,
    pub markers: Vec<Marker>,
}

/// A saved dashboard file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub tool: String,
    pub today: NaiveDate,
    pub latest_date: NaiveDate,
    pub rows_read: usize,
    pub rows_used: usize,
    pub forecast: ForecastResult,
    pub freshness: Freshness,
    pub windows: WindowSummary,
    pub chart: ChartData,
}
