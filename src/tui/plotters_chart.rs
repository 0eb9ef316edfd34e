//! Plotters-powered sales chart widget for Ratatui.
//!
//! Three daily series (sold, produced, suggested) are drawn as lines and the
//! shortage/event/holiday markers as colored dots on top of the sold line.
//! Plotters output goes into the Ratatui buffer via `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::MarkerKind;

/// A render-only chart description. All series and bounds are computed
/// outside the render call; x values are days since the common era.
pub struct SalesChart<'a> {
    pub sold: &'a [(f64, f64)],
    /// Only days with a known production figure.
    pub produced: &'a [(f64, f64)],
    /// Per-day suggestions plus the forecast point.
    pub suggested: &'a [(f64, f64)],
    pub markers: &'a [(f64, f64, MarkerKind)],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

pub const SOLD_COLOR: RGBColor = RGBColor(255, 80, 80);
pub const PRODUCED_COLOR: RGBColor = RGBColor(0, 220, 0);
pub const SUGGESTED_COLOR: RGBColor = RGBColor(0, 255, 255);

pub fn marker_color(kind: MarkerKind) -> RGBColor {
    match kind {
        MarkerKind::Shortage => RGBColor(255, 0, 255),
        MarkerKind::Event => RGBColor(255, 215, 0),
        MarkerKind::Holiday => WHITE,
    }
}

impl<'a> Widget for SalesChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to build a chart in a tiny area; show a hint instead.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // Suggested first so the actual figures stay visible where they overlap.
            chart.draw_series(LineSeries::new(self.suggested.iter().copied(), &SUGGESTED_COLOR))?;
            chart.draw_series(LineSeries::new(self.produced.iter().copied(), &PRODUCED_COLOR))?;
            chart.draw_series(LineSeries::new(self.sold.iter().copied(), &SOLD_COLOR))?;

            // `Circle` radii are mis-scaled by the ratatui backend; a colored
            // `Pixel` reads as a dot in the terminal.
            chart.draw_series(
                self.markers
                    .iter()
                    .map(|&(x, y, kind)| Pixel::new((x, y), marker_color(kind))),
            )?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
