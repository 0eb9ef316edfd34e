//! Command-line parsing for the pizza production planner.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the planning code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "pizza", version, about = "Daily pizza production planner")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the summary panels, the forecast card and an ASCII chart.
    Report(ReportArgs),
    /// Write the daily series (CSV) and/or the full dashboard (JSON).
    Export(ExportArgs),
    /// Plot a previously exported dashboard JSON.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying pipeline as `pizza report`, but renders
    /// results in a terminal UI using Ratatui.
    Tui(SourceArgs),
}

/// Where to load the sheet from, and how to read it.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Local CSV export of the sales sheet.
    #[arg(short = 'f', long, value_name = "CSV")]
    pub csv: Option<PathBuf>,

    /// Published CSV URL (defaults to $PIZZA_SHEET_URL).
    #[arg(long, conflicts_with = "csv")]
    pub url: Option<String>,

    /// Treat this date as today (YYYY-MM-DD) instead of the local clock.
    #[arg(long, value_parser = parse_date_arg)]
    pub today: Option<NaiveDate>,

    /// Header of the date column.
    #[arg(long, default_value = "Fecha")]
    pub date_column: String,

    /// Header of the pizzas-sold column.
    #[arg(long, default_value = "Pizzas Vendidas")]
    pub sold_column: String,

    /// Header of the pizzas-produced column.
    #[arg(long, default_value = "Pizzas Producidas")]
    pub produced_column: String,

    /// Header of the sports-event column.
    #[arg(long, default_value = "Partido")]
    pub event_column: String,

    /// Header of the holiday column.
    #[arg(long, default_value = "Feriado")]
    pub holiday_column: String,

    /// Pizzas added on top of sales (and again per event/holiday).
    #[arg(long, default_value_t = 15)]
    pub increment: u32,

    /// Same-weekday occurrences averaged by the forecast.
    #[arg(long, default_value_t = 4)]
    pub lookback_weeks: u32,

    /// Minimum distinct days of data before forecasting.
    #[arg(long, default_value_t = 5)]
    pub min_history_days: usize,

    /// Average used when no same-weekday history is found.
    #[arg(long, default_value_t = 100.0)]
    pub fallback_average: f64,
}

/// Options for the text report.
#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,

    /// Only plot the most recent N days.
    #[arg(long, default_value_t = 25)]
    pub days: u64,

    /// List dropped and patched rows.
    #[arg(long)]
    pub issues: bool,
}

/// Options for exports.
#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Export per-day series to CSV.
    #[arg(long, value_name = "CSV")]
    pub series: Option<PathBuf>,

    /// Export the full dashboard to JSON.
    #[arg(long, value_name = "JSON")]
    pub json: Option<PathBuf>,
}

/// Options for plotting a saved dashboard.
#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Dashboard JSON file produced by `pizza export --json`.
    #[arg(long, value_name = "JSON")]
    pub snapshot: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,

    /// Only plot the most recent N days (0 = all).
    #[arg(long, default_value_t = 0)]
    pub days: u64,
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}
