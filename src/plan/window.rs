//! Trailing-window sales totals.
//!
//! All windows are half-open `(after, up_to]` in days: a record exactly `n`
//! days before the reference is outside the last-`n`-days window, and the
//! reference day itself is inside. Adjacent windows therefore never share a day.

use chrono::{Days, NaiveDate};

use crate::domain::{DailyIndex, Trend, WindowSummary};

/// Sum of `sold` for days `d` with `after < d <= up_to`.
pub fn sum_window(index: &DailyIndex, after: NaiveDate, up_to: NaiveDate) -> u64 {
    index
        .records()
        .filter(|r| r.date > after && r.date <= up_to)
        .map(|r| u64::from(r.sold))
        .sum()
}

/// Sum of `sold` over the `n` days ending at `reference` (inclusive).
pub fn sum_last_n_days(index: &DailyIndex, reference: NaiveDate, n: u64) -> u64 {
    match reference.checked_sub_days(Days::new(n)) {
        Some(after) => sum_window(index, after, reference),
        None => sum_window(index, NaiveDate::MIN, reference),
    }
}

/// Panel totals relative to the latest indexed date. `None` for an empty index.
pub fn summarize_windows(index: &DailyIndex) -> Option<WindowSummary> {
    let reference = index.latest_date()?;

    let week_ago = reference.checked_sub_days(Days::new(7)).unwrap_or(NaiveDate::MIN);
    let two_weeks_ago = reference.checked_sub_days(Days::new(14)).unwrap_or(NaiveDate::MIN);

    let this_week = sum_window(index, week_ago, reference);
    let previous_week = sum_window(index, two_weeks_ago, week_ago);
    let delta = this_week as i64 - previous_week as i64;

    Some(WindowSummary {
        reference,
        last_7: sum_last_n_days(index, reference, 7),
        last_30: sum_last_n_days(index, reference, 30),
        this_week,
        previous_week,
        delta,
        trend: if delta >= 0 { Trend::Up } else { Trend::Down },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DailyRecord;

    fn record(date: NaiveDate, sold: u32) -> DailyRecord {
        DailyRecord {
            date,
            sold,
            produced: None,
            event: None,
            holiday: None,
        }
    }

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    #[test]
    fn seven_day_boundary_excludes_eighth_day() {
        let r = reference();
        let mut records: Vec<DailyRecord> = (0..7).map(|i| record(r - Days::new(i), 10)).collect();
        let index = DailyIndex::from_records(records.clone());
        assert_eq!(sum_last_n_days(&index, r, 7), 70);

        records.push(record(r - Days::new(7), 5));
        let index = DailyIndex::from_records(records);
        assert_eq!(sum_last_n_days(&index, r, 7), 70);
        assert_eq!(sum_last_n_days(&index, r, 8), 75);
    }

    #[test]
    fn sums_are_monotonic_in_window_length() {
        let r = reference();
        let records = (0..45).map(|i| record(r - Days::new(i * 2), (i as u32 * 7) % 13)).collect::<Vec<_>>();
        let index = DailyIndex::from_records(records);

        let mut prev = 0;
        for n in 0..100 {
            let s = sum_last_n_days(&index, r, n);
            assert!(s >= prev, "sum for n={n} decreased");
            prev = s;
        }
        assert_eq!(sum_last_n_days(&index, r, 0), 0);
    }

    #[test]
    fn week_over_week_uses_disjoint_windows() {
        let r = reference();
        let mut records = Vec::new();
        for i in 0..7 {
            records.push(record(r - Days::new(i), 10));
        }
        for i in 7..14 {
            records.push(record(r - Days::new(i), 12));
        }
        records.push(record(r - Days::new(14), 1000));
        let index = DailyIndex::from_records(records);

        let s = summarize_windows(&index).unwrap();
        assert_eq!(s.reference, r);
        assert_eq!(s.this_week, 70);
        assert_eq!(s.previous_week, 84);
        assert_eq!(s.delta, -14);
        assert_eq!(s.trend, Trend::Down);
        assert_eq!(s.last_7, 70);
        assert_eq!(s.last_30, 70 + 84 + 1000);
    }

    #[test]
    fn flat_week_counts_as_up() {
        let r = reference();
        let records = vec![record(r, 5), record(r - Days::new(7), 5)];
        let s = summarize_windows(&DailyIndex::from_records(records)).unwrap();
        assert_eq!(s.delta, 0);
        assert_eq!(s.trend, Trend::Up);
    }

    #[test]
    fn gaps_in_data_do_not_shift_windows() {
        let r = reference();
        // Only two rows; the older one sits exactly 30 days back.
        let records = vec![record(r, 3), record(r - Days::new(30), 100)];
        let s = summarize_windows(&DailyIndex::from_records(records)).unwrap();
        assert_eq!(s.last_30, 3);
    }
}
