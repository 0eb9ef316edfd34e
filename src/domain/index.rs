//! Date-keyed view over the parsed records.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::DailyRecord;

/// Records keyed by date, plus the ascending list of dates.
///
/// Built once per load and read-only afterwards. The last date is the
/// reference day for every trailing-window calculation.
#[derive(Debug, Clone, Default)]
pub struct DailyIndex {
    records: BTreeMap<NaiveDate, DailyRecord>,
    dates: Vec<NaiveDate>,
}

impl DailyIndex {
    /// Build the index. When two records share a date the later one wins.
    pub fn from_records(records: impl IntoIterator<Item = DailyRecord>) -> Self {
        let records: BTreeMap<NaiveDate, DailyRecord> =
            records.into_iter().map(|r| (r.date, r)).collect();
        let dates = records.keys().copied().collect();
        Self { records, dates }
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DailyRecord> {
        self.records.get(&date)
    }

    /// Distinct dates, ascending.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Records in date order.
    pub fn records(&self) -> impl Iterator<Item = &DailyRecord> {
        self.records.values()
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn latest(&self) -> Option<&DailyRecord> {
        self.latest_date().and_then(|d| self.records.get(&d))
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
