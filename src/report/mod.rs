//! Reporting utilities: chart series/markers and formatted terminal output.

pub mod format;
pub mod series;

pub use format::{format_forecast_card, format_row_issues, format_run_summary, format_trend};
pub use series::{build_chart_data, build_markers};
