//! Forecast card state.
//!
//! The forecast is only shown when today's row is in and production has been
//! recorded for it. `today` is passed in; reading the clock is the caller's job.

use chrono::NaiveDate;

use crate::domain::{DailyRecord, ForecastResult, Freshness};

/// Decide what the forecast card shows.
///
/// Order of checks:
/// 1. no forecast value: `InsufficientData`
/// 2. latest is today with known production: `Fresh`
/// 3. latest is after today: `FutureDated`
/// 4. otherwise: `Stale` with the number of whole days since latest
pub fn evaluate_freshness(
    latest: &DailyRecord,
    forecast: Option<&ForecastResult>,
    today: NaiveDate,
) -> Freshness {
    let Some(predicted) = forecast.and_then(|f| f.predicted) else {
        return Freshness::InsufficientData;
    };

    if latest.date == today && latest.produced.is_some() {
        return Freshness::Fresh { forecast: predicted };
    }

    let days = (today - latest.date).num_days();
    if days < 0 {
        Freshness::FutureDated { days_ahead: -days }
    } else {
        Freshness::Stale { days }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    fn record(date: NaiveDate, produced: Option<u32>) -> DailyRecord {
        DailyRecord {
            date,
            sold: 40,
            produced,
            event: None,
            holiday: None,
        }
    }

    fn forecast(predicted: Option<u32>) -> ForecastResult {
        ForecastResult {
            predicted,
            sample_count: 4,
            average: 95.0,
            used_fallback: false,
            target_date: today() + Days::new(1),
        }
    }

    #[test]
    fn fresh_when_today_and_produced_known() {
        let f = forecast(Some(110));
        let state = evaluate_freshness(&record(today(), Some(0)), Some(&f), today());
        assert_eq!(state, Freshness::Fresh { forecast: 110 });
    }

    #[test]
    fn unknown_production_today_is_stale() {
        let f = forecast(Some(110));
        let state = evaluate_freshness(&record(today(), None), Some(&f), today());
        assert_eq!(state, Freshness::Stale { days: 0 });
    }

    #[test]
    fn stale_counts_whole_days() {
        let f = forecast(Some(110));
        let latest = today() - Days::new(3);
        let state = evaluate_freshness(&record(latest, Some(50)), Some(&f), today());
        assert_eq!(state, Freshness::Stale { days: 3 });
    }

    #[test]
    fn insufficient_data_takes_precedence() {
        let f = forecast(None);
        let state = evaluate_freshness(&record(today(), Some(50)), Some(&f), today());
        assert_eq!(state, Freshness::InsufficientData);
        let state = evaluate_freshness(&record(today(), Some(50)), None, today());
        assert_eq!(state, Freshness::InsufficientData);
    }

    #[test]
    fn future_dated_latest_is_flagged() {
        let f = forecast(Some(110));
        let latest = today() + Days::new(2);
        let state = evaluate_freshness(&record(latest, Some(50)), Some(&f), today());
        assert_eq!(state, Freshness::FutureDated { days_ahead: 2 });
    }
}
