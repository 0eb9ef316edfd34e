//! `pizza-planner` library crate.
//!
//! The binary (`pizza`) is a thin wrapper around this library so that the
//! planning rules (suggestions, next-day forecast, trailing windows and the
//! freshness card) are testable without spawning processes or a terminal.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod plan;
pub mod plot;
pub mod report;
pub mod tui;
