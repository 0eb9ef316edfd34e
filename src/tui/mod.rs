//! Ratatui-based terminal UI.
//!
//! The dashboard shows a header with the source and latest day, the sales
//! chart (sold, produced, suggested plus markers) and three panels: the
//! forecast card, the last 7 days with the week-over-week trend, and the
//! last 30 days.

use std::io;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, warn};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
    Terminal,
};

use crate::app::pipeline::{self, RunOutput};
use crate::data::DataSource;
use crate::domain::{ChartData, Freshness, MarkerKind, PlannerConfig};
use crate::error::AppError;
use crate::report::{format_forecast_card, format_trend};

mod plotters_chart;

use plotters_chart::{marker_color, SalesChart, PRODUCED_COLOR, SOLD_COLOR, SUGGESTED_COLOR};

/// Days shown when the chart is zoomed in.
const RECENT_DAYS: u64 = 30;

/// Start the TUI.
///
/// The first load happens before the terminal is switched to raw mode, so a
/// missing file or an empty sheet is reported as a normal CLI error.
/// `follow_clock` re-reads the local date on every reload.
pub fn run(source: DataSource, config: PlannerConfig, today: NaiveDate, follow_clock: bool) -> Result<(), AppError> {
    let mut app = App::new(source, config, today, follow_clock)?;

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    source: DataSource,
    config: PlannerConfig,
    today: NaiveDate,
    follow_clock: bool,
    recent_only: bool,
    status: String,
    run: RunOutput,
}

impl App {
    fn new(source: DataSource, config: PlannerConfig, today: NaiveDate, follow_clock: bool) -> Result<Self, AppError> {
        let run = pipeline::run(&source, &config, today)?;
        let status = format!("Loaded {} days.", run.ingest.index.len());
        Ok(Self {
            source,
            config,
            today,
            follow_clock,
            recent_only: true,
            status,
            run,
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the UI should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('t') => {
                self.recent_only = !self.recent_only;
                self.status = if self.recent_only {
                    format!("Showing the last {RECENT_DAYS} days.")
                } else {
                    "Showing all days.".to_string()
                };
            }
            _ => {}
        }
        false
    }

    /// Reload the sheet. A failed reload keeps the previous dashboard.
    fn reload(&mut self) {
        if self.follow_clock {
            self.today = crate::app::local_today();
        }
        match pipeline::run(&self.source, &self.config, self.today) {
            Ok(run) => {
                info!("reloaded {} days from {}", run.ingest.index.len(), self.source.describe());
                self.status = format!(
                    "Reloaded {} days ({} rows dropped).",
                    run.ingest.index.len(),
                    run.ingest.dropped_rows()
                );
                self.run = run;
            }
            Err(err) => {
                warn!("reload failed: {err}");
                self.status = format!("Reload failed: {err}");
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let run = &self.run;
        let lines = vec![
            Line::from(vec![
                Span::styled("pizza", Style::default().fg(Color::Cyan)),
                Span::raw(format!(" | {}", self.source.describe())),
            ]),
            Line::from(Span::styled(
                format!(
                    "latest: {} | today: {} | days: {} | rows: {} read, {} dropped",
                    run.latest_date(),
                    self.today,
                    run.ingest.index.len(),
                    run.ingest.rows_read,
                    run.ingest.dropped_rows(),
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(5)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_panels(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title(chart_title()).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let tail = self.recent_only.then_some(RECENT_DAYS);
        let series = chart_series(&self.run.chart, tail);
        if series.sold.is_empty() {
            let msg = Paragraph::new("No sales to chart.").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        }

        let (chart_rect, insets) = chart_layout(inner);
        let widget = SalesChart {
            sold: &series.sold,
            produced: &series.produced,
            suggested: &series.suggested,
            markers: &series.markers,
            x_bounds: series.x_bounds,
            y_bounds: series.y_bounds,
            x_label: "date",
            y_label: "pizzas",
            fmt_x: fmt_axis_date,
            fmt_y: fmt_axis_count,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, series.x_bounds, series.y_bounds);
        }
    }

    fn draw_panels(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(30),
                Constraint::Percentage(30),
            ])
            .split(area);

        let run = &self.run;
        let card_style = match run.freshness {
            Freshness::Fresh { .. } => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            Freshness::Stale { .. } | Freshness::FutureDated { .. } => Style::default().fg(Color::Yellow),
            Freshness::InsufficientData => Style::default().fg(Color::Gray),
        };
        let card = Paragraph::new(vec![
            Line::from(Span::styled(format_forecast_card(&run.freshness), card_style)),
            Line::from(Span::styled(
                format!("for {}", run.forecast.target_date),
                Style::default().fg(Color::Gray),
            )),
        ])
        .block(Block::default().title("Tomorrow").borders(Borders::ALL));
        frame.render_widget(card, chunks[0]);

        let trend_color = match run.windows.trend {
            crate::domain::Trend::Up => Color::Green,
            crate::domain::Trend::Down => Color::Red,
        };
        let week = Paragraph::new(vec![
            Line::from(Span::styled(
                run.windows.last_7.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(format_trend(&run.windows), Style::default().fg(trend_color))),
        ])
        .block(Block::default().title("Last 7 days").borders(Borders::ALL));
        frame.render_widget(week, chunks[1]);

        let month = Paragraph::new(Line::from(Span::styled(
            run.windows.last_30.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().title("Last 30 days").borders(Borders::ALL));
        frame.render_widget(month, chunks[2]);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "r reload  t toggle range  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn chart_title() -> Line<'static> {
    let swatch = |label: &'static str, color: plotters::style::RGBColor| {
        Span::styled(format!(" {label} "), Style::default().fg(tui_color(color)))
    };
    Line::from(vec![
        Span::raw("Sales "),
        swatch("sold", SOLD_COLOR),
        swatch("produced", PRODUCED_COLOR),
        swatch("suggested", SUGGESTED_COLOR),
        swatch("shortage", marker_color(MarkerKind::Shortage)),
        swatch("event", marker_color(MarkerKind::Event)),
        swatch("holiday", marker_color(MarkerKind::Holiday)),
    ])
}

fn tui_color(c: plotters::style::RGBColor) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}

/// Chart data projected onto plot coordinates.
#[derive(Debug, Default)]
struct ChartSeries {
    sold: Vec<(f64, f64)>,
    produced: Vec<(f64, f64)>,
    suggested: Vec<(f64, f64)>,
    markers: Vec<(f64, f64, MarkerKind)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

fn day_x(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

/// Build plot series, keeping only the last `tail_days` days (counted back
/// from the last sold day) when requested. Markers sit on the sold line.
fn chart_series(chart: &ChartData, tail_days: Option<u64>) -> ChartSeries {
    let Some(last) = chart.sold.last().map(|p| p.date) else {
        return ChartSeries::default();
    };
    let from = tail_days
        .and_then(|n| last.checked_sub_days(chrono::Days::new(n.saturating_sub(1))))
        .unwrap_or(NaiveDate::MIN);

    let project = |points: &[crate::domain::SeriesPoint]| -> Vec<(f64, f64)> {
        points
            .iter()
            .filter(|p| p.date >= from)
            .map(|p| (day_x(p.date), f64::from(p.value)))
            .collect()
    };

    let sold = project(&chart.sold);
    let produced = project(&chart.produced);
    let suggested = project(&chart.suggested);

    let markers = chart
        .markers
        .iter()
        .filter(|m| m.date >= from)
        .filter_map(|m| {
            chart
                .sold
                .iter()
                .find(|p| p.date == m.date)
                .map(|p| (day_x(m.date), f64::from(p.value), m.kind))
        })
        .collect::<Vec<_>>();

    let xs = sold.iter().chain(&produced).chain(&suggested).map(|&(x, _)| x);
    let ys = sold.iter().chain(&produced).chain(&suggested).map(|&(_, y)| y);
    let (x_min, x_max) = xs.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| (lo.min(x), hi.max(x)));
    let (_, y_max) = ys.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| (lo.min(y), hi.max(y)));

    // Counts start at zero; a single day still needs a non-empty x range.
    let x_bounds = if x_max > x_min { [x_min, x_max] } else { [x_min - 1.0, x_min + 1.0] };
    let y_top = if y_max.is_finite() && y_max > 0.0 { y_max * 1.05 } else { 1.0 };

    ChartSeries {
        sold,
        produced,
        suggested,
        markers,
        x_bounds,
        y_bounds: [0.0, y_top],
    }
}

fn fmt_axis_date(v: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(v.round() as i32)
        .map(|d| d.format("%m-%d").to_string())
        .unwrap_or_default()
}

fn fmt_axis_count(v: f64) -> String {
    format!("{v:.0}")
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 6,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    let y = chart.y + chart.height;
    if y < inner.y + inner.height - 1 {
        for i in 0..ticks {
            let u = i as f64 / (ticks as f64 - 1.0);
            let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
            let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
            let label = fmt_axis_date(x_val);
            let start = x.saturating_sub((label.len() / 2) as u16);
            frame.render_widget(
                Paragraph::new(label.clone()).style(style),
                Rect {
                    x: start,
                    y,
                    width: label.len() as u16,
                    height: 1,
                },
            );
        }
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = fmt_axis_count(y_val);
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label.len() as u16);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label.clone()).style(style),
            Rect {
                x: start,
                y,
                width: label.len() as u16,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new("date")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }
}
