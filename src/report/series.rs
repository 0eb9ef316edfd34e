//! Chart series and markers.
//!
//! Builds the data-and-marker surface consumed by the chart front-ends
//! (ASCII plot, TUI, JSON export). No styling decisions are made here.

use crate::domain::{
    ChartData, DailyIndex, ForecastResult, Marker, MarkerKind, SeriesPoint, SuggestionPoint,
};

/// Label shown on sold-out days.
pub const SHORTAGE_LABEL: &str = "sold out";
/// Label shown on holidays (the holiday name stays in the record).
pub const HOLIDAY_LABEL: &str = "Holiday";

/// Assemble the chart surface from the index and the engine outputs.
///
/// Unlike the sheet's web dashboard, days with unknown production are left out
/// of the produced series instead of being drawn as 0, and get no sold-out marker.
pub fn build_chart_data(
    index: &DailyIndex,
    suggestions: &[SuggestionPoint],
    forecast: Option<&ForecastResult>,
) -> ChartData {
    let sold = index
        .records()
        .map(|r| SeriesPoint {
            date: r.date,
            value: r.sold,
        })
        .collect();

    let produced = index
        .records()
        .filter_map(|r| {
            r.produced.map(|value| SeriesPoint {
                date: r.date,
                value,
            })
        })
        .collect();

    let mut suggested = suggestions.to_vec();
    if let Some(f) = forecast {
        if let Some(value) = f.predicted {
            suggested.push(SeriesPoint {
                date: f.target_date,
                value,
            });
        }
    }

    ChartData {
        sold,
        produced,
        suggested,
        markers: build_markers(index),
    }
}

/// Shortage, event and holiday markers, ordered by date then kind.
pub fn build_markers(index: &DailyIndex) -> Vec<Marker> {
    let mut markers = Vec::new();
    for r in index.records() {
        if r.is_shortage() {
            markers.push(Marker {
                date: r.date,
                kind: MarkerKind::Shortage,
                label: SHORTAGE_LABEL.to_string(),
            });
        }
        if let Some(event) = r.event.as_deref().filter(|s| !s.is_empty()) {
            markers.push(Marker {
                date: r.date,
                kind: MarkerKind::Event,
                label: event.to_string(),
            });
        }
        if r.has_holiday() {
            markers.push(Marker {
                date: r.date,
                kind: MarkerKind::Holiday,
                label: HOLIDAY_LABEL.to_string(),
            });
        }
    }
    markers
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};
    use crate::domain::{DailyRecord, PlanRules};
    use crate::plan::suggest_production;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn record(day: u32, sold: u32, produced: Option<u32>, event: Option<&str>, holiday: Option<&str>) -> DailyRecord {
        DailyRecord {
            date: d(day),
            sold,
            produced,
            event: event.map(str::to_string),
            holiday: holiday.map(str::to_string),
        }
    }

    fn index() -> DailyIndex {
        DailyIndex::from_records(vec![
            record(1, 50, Some(40), None, None),
            record(2, 30, None, Some("Final"), Some("Dia del Padre")),
            record(3, 20, Some(25), None, None),
        ])
    }

    #[test]
    fn produced_series_skips_unknown_days() {
        let index = index();
        let chart = build_chart_data(&index, &suggest_production(&index, &PlanRules::default()), None);
        assert_eq!(chart.sold.len(), 3);
        let produced_dates: Vec<NaiveDate> = chart.produced.iter().map(|p| p.date).collect();
        assert_eq!(produced_dates, vec![d(1), d(3)]);
        assert_eq!(chart.suggested.len(), 3);
    }

    #[test]
    fn forecast_point_is_appended_when_available() {
        let index = index();
        let suggestions = suggest_production(&index, &PlanRules::default());
        let forecast = ForecastResult {
            predicted: Some(115),
            sample_count: 0,
            average: 100.0,
            used_fallback: true,
            target_date: d(3) + Days::new(1),
        };
        let chart = build_chart_data(&index, &suggestions, Some(&forecast));
        assert_eq!(chart.suggested.len(), 4);
        assert_eq!(chart.suggested[3], SeriesPoint { date: d(4), value: 115 });

        let absent = ForecastResult { predicted: None, ..forecast };
        let chart = build_chart_data(&index, &suggestions, Some(&absent));
        assert_eq!(chart.suggested.len(), 3);
    }

    #[test]
    fn markers_by_kind() {
        let markers = build_markers(&index());
        let kinds: Vec<(NaiveDate, MarkerKind)> = markers.iter().map(|m| (m.date, m.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                (d(1), MarkerKind::Shortage),
                (d(2), MarkerKind::Event),
                (d(2), MarkerKind::Holiday),
            ]
        );
        assert_eq!(markers[1].label, "Final");
        assert_eq!(markers[2].label, HOLIDAY_LABEL);
    }
}
