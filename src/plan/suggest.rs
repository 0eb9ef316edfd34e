//! Suggested production per day.
//!
//! `suggested = sold + increment`, plus one more `increment` for a sports
//! event and one more for a holiday.

use crate::domain::{DailyIndex, DailyRecord, PlanRules, SuggestionPoint};

/// Suggested production for a single record.
pub fn suggested_value(record: &DailyRecord, rules: &PlanRules) -> u32 {
    let flags = u32::from(record.has_event()) + u32::from(record.has_holiday());
    record
        .sold
        .saturating_add(rules.increment.saturating_mul(1 + flags))
}

/// One suggestion per indexed day, in date order.
pub fn suggest_production(index: &DailyIndex, rules: &PlanRules) -> Vec<SuggestionPoint> {
    index
        .records()
        .map(|r| SuggestionPoint {
            date: r.date,
            value: suggested_value(r, rules),
        })
        .collect()
}
