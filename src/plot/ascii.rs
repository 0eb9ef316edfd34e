//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - sold: `*`
//! - produced: `+`
//! - suggested (incl. the forecast point): `.`
//! - marker row under the grid: `X` (shortage), `E` (event), `H` (holiday)

use chrono::{Datelike, Days, NaiveDate};

use crate::domain::{ChartData, Marker, MarkerKind, SeriesPoint};

const LEGEND: &str = "legend: * sold  + produced  . suggested | X shortage  E event  H holiday";

/// Render the three daily series and the marker row.
///
/// `tail_days` limits the plot to the most recent days (counted back from the
/// last plotted date, forecast included).
pub fn render_ascii_plot(chart: &ChartData, width: usize, height: usize, tail_days: Option<u64>) -> String {
    let width = width.max(10);
    let height = height.max(3);

    let Some((first, last)) = date_range(chart) else {
        return "Plot: no data\n".to_string();
    };
    let first = match tail_days {
        Some(n) if n > 0 => last
            .checked_sub_days(Days::new(n - 1))
            .map(|d| d.max(first))
            .unwrap_or(first),
        _ => first,
    };

    let visible = |series: &[SeriesPoint]| -> Vec<SeriesPoint> {
        series.iter().copied().filter(|p| p.date >= first).collect()
    };
    let sold = visible(&chart.sold);
    let produced = visible(&chart.produced);
    let suggested = visible(&chart.suggested);
    let markers: Vec<&Marker> = chart.markers.iter().filter(|m| m.date >= first).collect();

    let (t_min, t_max) = x_domain(first, last);
    let (y_min, y_max) = y_range(&[&sold, &produced, &suggested]).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Lower-priority series first; sold vertices are drawn last so they stay visible.
    for (series, ch) in [(&suggested, '.'), (&produced, '+'), (&sold, '*')] {
        draw_series(&mut grid, series, ch, (t_min, t_max), (y_min, y_max));
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {first} → {last} | y=[{y_min:.2}, {y_max:.2}]\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    if !markers.is_empty() {
        let mut row = vec![' '; width];
        for m in markers {
            let x = map_x(day_number(m.date), t_min, t_max, width);
            // One cell per day: shortage beats event beats holiday.
            let ch = marker_char(m.kind);
            if row[x] == ' ' || priority(ch) < priority(row[x]) {
                row[x] = ch;
            }
        }
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out.push_str(LEGEND);
    out.push('\n');
    out
}

fn marker_char(kind: MarkerKind) -> char {
    match kind {
        MarkerKind::Shortage => 'X',
        MarkerKind::Event => 'E',
        MarkerKind::Holiday => 'H',
    }
}

fn priority(ch: char) -> u8 {
    match ch {
        'X' => 0,
        'E' => 1,
        _ => 2,
    }
}

fn day_number(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

fn date_range(chart: &ChartData) -> Option<(NaiveDate, NaiveDate)> {
    let dates = chart
        .sold
        .iter()
        .chain(chart.produced.iter())
        .chain(chart.suggested.iter())
        .map(|p| p.date);
    let mut min: Option<NaiveDate> = None;
    let mut max: Option<NaiveDate> = None;
    for d in dates {
        min = Some(min.map_or(d, |m| m.min(d)));
        max = Some(max.map_or(d, |m| m.max(d)));
    }
    Some((min?, max?))
}

fn x_domain(first: NaiveDate, last: NaiveDate) -> (f64, f64) {
    let (t0, t1) = (day_number(first), day_number(last));
    if t1 > t0 { (t0, t1) } else { (t0 - 1.0, t0 + 1.0) }
}

fn y_range(series: &[&Vec<SeriesPoint>]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for s in series {
        for p in s.iter() {
            let v = f64::from(p.value);
            min_y = min_y.min(v);
            max_y = max_y.max(v);
        }
    }
    if !(min_y.is_finite() && max_y.is_finite()) {
        return None;
    }
    if max_y > min_y {
        Some((min_y, max_y))
    } else {
        Some((min_y - 1.0, max_y + 1.0))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_series(grid: &mut [Vec<char>], series: &[SeriesPoint], ch: char, x: (f64, f64), y: (f64, f64)) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for p in series {
        let px = map_x(day_number(p.date), x.0, x.1, width);
        let py = map_y(f64::from(p.value), y.0, y.1, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, px, py, ch);
        }
        prev = Some((px, py));
    }
    // Vertices overwrite connecting lines of other series.
    for p in series {
        let px = map_x(day_number(p.date), x.0, x.1, width);
        let py = map_y(f64::from(p.value), y.0, y.1, height);
        grid[py][px] = ch;
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn flat_sold() -> ChartData {
        ChartData {
            sold: (1..=3).map(|day| SeriesPoint { date: d(day), value: 10 }).collect(),
            ..ChartData::default()
        }
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let txt = render_ascii_plot(&flat_sold(), 10, 3, None);
        let expected = concat!(
            "Plot: 2025-06-01 → 2025-06-03 | y=[8.90, 11.10]\n",
            "          \n",
            "**********\n",
            "          \n",
            "legend: * sold  + produced  . suggested | X shortage  E event  H holiday\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn marker_row_prefers_shortage() {
        let mut chart = flat_sold();
        chart.markers = vec![
            Marker { date: d(1), kind: MarkerKind::Holiday, label: "Holiday".to_string() },
            Marker { date: d(1), kind: MarkerKind::Shortage, label: "sold out".to_string() },
            Marker { date: d(3), kind: MarkerKind::Event, label: "Final".to_string() },
        ];
        let txt = render_ascii_plot(&chart, 10, 3, None);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[4], "X        E");
    }

    #[test]
    fn tail_days_limits_range() {
        let chart = ChartData {
            sold: (1..=20).map(|day| SeriesPoint { date: d(day), value: day }).collect(),
            ..ChartData::default()
        };
        let txt = render_ascii_plot(&chart, 20, 5, Some(5));
        assert!(txt.starts_with("Plot: 2025-06-16 → 2025-06-20 |"));
    }

    #[test]
    fn empty_chart() {
        assert_eq!(render_ascii_plot(&ChartData::default(), 10, 3, None), "Plot: no data\n");
    }
}
