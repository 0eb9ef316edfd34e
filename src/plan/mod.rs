//! Production planning rules.
//!
//! Every function here is a pure function of the `DailyIndex` (plus an explicit
//! `today` for freshness), so the whole planning step is deterministic:
//!
//! - `suggest`: per-day recommended production
//! - `forecast`: next-day estimate from same-weekday history
//! - `window`: trailing sales totals for the summary panels
//! - `freshness`: forecast card state (fresh / stale / not enough data)

pub mod forecast;
pub mod freshness;
pub mod suggest;
pub mod window;

pub use forecast::forecast_next_day;
pub use freshness::evaluate_freshness;
pub use suggest::{suggest_production, suggested_value};
pub use window::{summarize_windows, sum_last_n_days, sum_window};
