//! Plotters-powered daily sales chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A lightweight, render-only line chart description.
///
/// All series and bounds are computed outside the render call, so `render()`
/// only draws.
pub struct DailySalesChart<'a> {
    /// `(day index, revenue)` in calendar order.
    pub series: &'a [(f64, f64)],
    /// Day label per index (`DD/MM/YYYY`).
    pub day_labels: &'a [String],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub y_label: &'a str,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for DailySalesChart<'a> {
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
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 10)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            let day_labels = self.day_labels;
            chart
                .configure_mesh()
                .disable_x_mesh()
                .y_desc(self.y_label)
                .x_labels(day_labels.len().clamp(2, 6))
                .y_labels(5)
                .x_label_formatter(&|v| day_label(day_labels, *v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&RGBColor(158, 158, 158)))
                .axis_style(&RGBColor(158, 158, 158))
                .light_line_style(&RGBColor(44, 44, 44))
                .draw()?;

            // Grayscale palette: white line, light-gray day markers.
            let line_color = WHITE;
            let point_color = RGBColor(224, 224, 224);

            chart.draw_series(LineSeries::new(self.series.iter().copied(), &line_color))?;
            chart.draw_series(
                self.series
                    .iter()
                    .map(|&(x, y)| Pixel::new((x, y), point_color)),
            )?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Label for a tick at x = `v`; only whole indices get a date.
fn day_label(labels: &[String], v: f64) -> String {
    let idx = v.round();
    if (v - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels
        .get(idx as usize)
        .map(|l| l.get(..5).unwrap_or(l).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_labels_only_on_whole_indices() {
        let labels = vec!["20/12/2023".to_string(), "05/01/2024".to_string()];
        assert_eq!(day_label(&labels, 0.0), "20/12");
        assert_eq!(day_label(&labels, 1.0), "05/01");
        assert_eq!(day_label(&labels, 0.5), "");
        assert_eq!(day_label(&labels, 7.0), "");
        assert_eq!(day_label(&labels, -1.0), "");
    }
}
