//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the sheet source and today's date
//! - runs the planning pipeline
//! - prints reports/plots
//! - writes optional exports

use chrono::{Local, NaiveDate};
use clap::Parser;
use log::info;

use crate::cli::{Command, ExportArgs, PlotArgs, ReportArgs, SourceArgs};
use crate::data::DataSource;
use crate::domain::{ColumnNames, PlanRules, PlannerConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `pizza` binary.
pub fn run() -> Result<(), AppError> {
    // We want `pizza` and `pizza -f ventas.csv` to behave like `pizza tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Report(args) => handle_report(args),
        Command::Export(args) => handle_export(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let (source, config, today) = resolve_run_inputs(&args.source)?;
    let run = pipeline::run(&source, &config, today)?;

    println!("{}", crate::report::format_run_summary(&run, &source.describe()));

    if args.issues {
        let issues = crate::report::format_row_issues(&run.ingest.row_issues);
        if !issues.is_empty() {
            println!("{issues}");
        }
    }

    if !args.no_plot {
        let tail = if args.days == 0 { None } else { Some(args.days) };
        print!(
            "{}",
            crate::plot::render_ascii_plot(&run.chart, args.width, args.height, tail)
        );
    }

    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    if args.series.is_none() && args.json.is_none() {
        return Err(AppError::usage("Nothing to export: pass `--series <csv>` and/or `--json <file>`."));
    }

    let (source, config, today) = resolve_run_inputs(&args.source)?;
    let run = pipeline::run(&source, &config, today)?;

    if let Some(path) = &args.series {
        crate::io::export::write_series_csv(path, &run)?;
        info!("wrote series CSV to {}", path.display());
    }
    if let Some(path) = &args.json {
        crate::io::snapshot::write_snapshot_json(path, &run.snapshot())?;
        info!("wrote dashboard JSON to {}", path.display());
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let snapshot = crate::io::snapshot::read_snapshot_json(&args.snapshot)?;
    let tail = if args.days == 0 { None } else { Some(args.days) };

    println!(
        "{} (latest {}, as of {})",
        crate::report::format_forecast_card(&snapshot.freshness),
        snapshot.latest_date,
        snapshot.today
    );
    print!(
        "{}",
        crate::plot::render_ascii_plot(&snapshot.chart, args.width, args.height, tail)
    );
    Ok(())
}

fn handle_tui(args: SourceArgs) -> Result<(), AppError> {
    let (source, config, today) = resolve_run_inputs(&args)?;
    crate::tui::run(source, config, today, args.today.is_none())
}

/// Resolve source, config and the reference "today" for a run.
fn resolve_run_inputs(args: &SourceArgs) -> Result<(DataSource, PlannerConfig, NaiveDate), AppError> {
    let config = planner_config_from_args(args)?;
    let source = match DataSource::resolve(args.csv.clone(), args.url.clone()) {
        Some(source) => source,
        None => DataSource::File(crate::cli::picker::prompt_for_csv_path()?),
    };
    let today = args.today.unwrap_or_else(local_today);
    info!("source: {} | today: {today}", source.describe());
    Ok((source, config, today))
}

pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn planner_config_from_args(args: &SourceArgs) -> Result<PlannerConfig, AppError> {
    if !(args.fallback_average.is_finite() && args.fallback_average >= 0.0) {
        return Err(AppError::usage("`--fallback-average` must be a finite, non-negative number."));
    }
    if args.lookback_weeks == 0 {
        return Err(AppError::usage("`--lookback-weeks` must be at least 1."));
    }

    Ok(PlannerConfig {
        columns: ColumnNames {
            date: args.date_column.clone(),
            sold: args.sold_column.clone(),
            produced: args.produced_column.clone(),
            event: args.event_column.clone(),
            holiday: args.holiday_column.clone(),
        },
        rules: PlanRules {
            increment: args.increment,
            lookback_weeks: args.lookback_weeks,
            min_history_days: args.min_history_days,
            fallback_average: args.fallback_average,
        },
    })
}

/// Rewrite argv so `pizza` defaults to `pizza tui`.
///
/// Rules:
/// - `pizza`                      -> `pizza tui`
/// - `pizza -f ventas.csv ...`    -> `pizza tui -f ventas.csv ...`
/// - `pizza --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "report" | "export" | "plot" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
