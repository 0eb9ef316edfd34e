//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the parsed daily record (`DailyRecord`) and its date index (`DailyIndex`)
//! - engine outputs (`ForecastResult`, `WindowSummary`, `Freshness`, markers)
//! - run configuration (`PlannerConfig`, `ColumnNames`, `PlanRules`)

pub mod index;
pub mod types;

pub use index::*;
pub use types::*;
