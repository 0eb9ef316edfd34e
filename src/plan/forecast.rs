//! Next-day production forecast.
//!
//! The estimate for `latest + 1` is the mean of `sold` on the same weekday as
//! `latest` over the previous `lookback_weeks` weeks, plus `increment`.
//!
//! Two sparse-data paths are kept apart:
//! - fewer than `min_history_days` distinct dates: no forecast at all
//! - no same-weekday sample in the lookback: the fallback average is used

use chrono::{Days, NaiveDate};

use crate::domain::{DailyIndex, ForecastResult, PlanRules};

/// Forecast production for the day after the latest indexed date.
///
/// Returns `None` only for an empty index.
pub fn forecast_next_day(index: &DailyIndex, rules: &PlanRules) -> Option<ForecastResult> {
    let latest = index.latest_date()?;
    let target_date = latest.checked_add_days(Days::new(1))?;

    let first = index.first_date()?;

    // Stepping back whole weeks keeps the weekday, so presence is the only check.
    // Nothing exists before the first indexed date, which bounds huge lookbacks.
    let samples: Vec<u32> = same_weekday_dates(latest, rules.lookback_weeks)
        .take_while(|d| *d >= first)
        .filter_map(|d| index.get(d).map(|r| r.sold))
        .collect();

    let sample_count = samples.len();
    let (average, used_fallback) = if sample_count > 0 {
        let sum: u64 = samples.iter().map(|&v| u64::from(v)).sum();
        (sum as f64 / sample_count as f64, false)
    } else {
        (rules.fallback_average, true)
    };

    let predicted = if index.len() < rules.min_history_days {
        None
    } else {
        Some(round_to_count(average + f64::from(rules.increment)))
    };

    Some(ForecastResult {
        predicted,
        sample_count,
        average,
        used_fallback,
        target_date,
    })
}

/// `latest - 7k` for `k = 1..=weeks`, most recent first. Stops at the start of the calendar.
fn same_weekday_dates(latest: NaiveDate, weeks: u32) -> impl Iterator<Item = NaiveDate> {
    (1..=u64::from(weeks)).map_while(move |k| latest.checked_sub_days(Days::new(7 * k)))
}

fn round_to_count(v: f64) -> u32 {
    if !v.is_finite() || v <= 0.0 {
        return 0;
    }
    v.round().min(u32::MAX as f64) as u32
}
