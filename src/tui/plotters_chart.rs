//! Chart widget for the TUI panels.
//!
//! Each panel is drawn by Plotters straight into the Ratatui buffer through
//! `plotters-ratatui-backend`, which gives labelled axes, filled bars, and
//! reference lines that Ratatui's own `Chart` lacks.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color as TuiColor, Style},
    widgets::Widget,
};

/// Precomputed series and bounds for one chart.
///
/// All data is computed outside the render call, which keeps `render()`
/// focused on drawing and lets the data prep be tested on its own.
#[derive(Debug, Clone, Default)]
pub struct ChartData {
    /// Scatter points.
    pub points: Vec<(f64, f64)>,
    /// Reference line (theory), drawn under the points.
    pub line: Vec<(f64, f64)>,
    /// Bars as `(left, right, height)`, rising from `y = 0`.
    pub bars: Vec<(f64, f64, f64)>,
    /// Horizontal reference levels.
    pub levels: Vec<f64>,
    /// Vertical markers with their colors.
    pub markers: Vec<(f64, RGBColor)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

/// One panel: borrowed data plus axis labels.
pub struct DropChart<'a> {
    pub data: &'a ChartData,
    pub x_label: &'a str,
    pub y_label: &'a str,
    /// Color of points and bars.
    pub data_color: RGBColor,
}

/// Theory lines and the true-unit marker.
pub const THEORY_COLOR: RGBColor = RGBColor(255, 80, 80);
/// The discovered-unit marker.
pub const DISCOVERED_COLOR: RGBColor = RGBColor(0, 255, 255);

impl<'a> Widget for DropChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters cannot lay out axes in a tiny panel.
        if area.width < 20 || area.height < 8 {
            buf.set_string(area.x, area.y, "Panel too small to draw.", Style::default().fg(TuiColor::Yellow));
            return;
        }

        let [x0, x1] = self.data.x_bounds;
        let [y0, y1] = self.data.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let data = self.data;
        let x_label = self.x_label;
        let y_label = self.y_label;
        let data_color = self.data_color;

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(x_label)
                .y_desc(y_label)
                .x_labels(5)
                .y_labels(4)
                .x_label_formatter(&|v| format!("{v:.1}"))
                .y_label_formatter(&|v| format!("{v:.1}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // 1) Bars.
            chart.draw_series(
                data.bars
                    .iter()
                    .map(|&(l, r, h)| Rectangle::new([(l, 0.0), (r, h)], data_color.filled())),
            )?;

            // 2) Reference levels and theory line.
            chart.draw_series(
                data.levels
                    .iter()
                    .map(|&y| PathElement::new(vec![(x0, y), (x1, y)], THEORY_COLOR)),
            )?;
            if data.line.len() >= 2 {
                chart.draw_series(LineSeries::new(data.line.iter().copied(), &THEORY_COLOR))?;
            }

            // 3) Observed points.
            //
            // `Circle` markers are avoided: the backend maps circle radii to
            // normalized canvas units, which produces huge circles.
            chart.draw_series(data.points.iter().map(|&(x, y)| Pixel::new((x, y), data_color)))?;

            // 4) Vertical markers last so they stay visible over bars.
            chart.draw_series(
                data.markers
                    .iter()
                    .map(|&(x, color)| PathElement::new(vec![(x, y0), (x, y1)], color)),
            )?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
