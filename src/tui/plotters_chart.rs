//! Plotters-powered chart widgets for Ratatui.
//!
//! Plotters output is drawn into the Ratatui buffer using
//! `plotters-ratatui-backend`. All series and bounds are computed outside the
//! render call (see `report`), so `render()` only draws.

use chrono::NaiveDate;
use plotters::prelude::*;
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::report::{StackedBarChart, TrendChart};

const CASES_COLOR: RGBColor = RGBColor(31, 119, 180);
const CASES_AVG_COLOR: RGBColor = RGBColor(255, 127, 14);
const DEATHS_COLOR: RGBColor = RGBColor(214, 39, 40);
const DEATHS_AVG_COLOR: RGBColor = RGBColor(44, 160, 44);

/// Number of dash on/off pairs across the x range.
const DASHES_ACROSS: f64 = 40.0;

/// Minimum area Plotters can lay a chart out in.
fn too_small(area: Rect, buf: &mut Buffer) -> bool {
    if area.width < 20 || area.height < 8 {
        buf.set_string(
            area.x,
            area.y,
            "Chart area too small (resize terminal).",
            Style::default().fg(Color::Yellow),
        );
        return true;
    }
    false
}

fn date_label(dates: &[NaiveDate], x: f64) -> String {
    if x < 0.0 {
        return String::new();
    }
    dates
        .get(x.round() as usize)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn count_label(y: f64) -> String {
    format!("{y:.0}")
}

/// New cases/deaths as points with dashed 7-day averages.
pub struct TrendPlottersChart<'a> {
    pub chart: &'a TrendChart,
}

impl Widget for TrendPlottersChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if too_small(area, buf) {
            return;
        }

        let chart = self.chart;
        let [x0, x1] = chart.x_bounds;
        let [y0, y1] = chart.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }
        let dash = (x1 - x0) / (DASHES_ACROSS * 2.0);

        let widget = widget_fn(move |root| {
            let mut ctx = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            ctx.configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc("date")
                .y_desc("counts")
                .x_labels(4)
                .y_labels(5)
                .x_label_formatter(&|v| date_label(&chart.dates, *v))
                .y_label_formatter(&|v| count_label(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // Averages first so the daily points stay visible on top.
            for (series, color) in [(&chart.ma_cases, CASES_AVG_COLOR), (&chart.ma_deaths, DEATHS_AVG_COLOR)] {
                ctx.draw_series(
                    dash_segments(series, dash)
                        .into_iter()
                        .map(move |seg| PathElement::new(seg.to_vec(), color)),
                )?;
            }

            // `Circle` markers render oversized through the ratatui backend,
            // so points are single pixels.
            for (series, color) in [(&chart.new_cases, CASES_COLOR), (&chart.new_deaths, DEATHS_COLOR)] {
                ctx.draw_series(series.iter().map(|&(x, y)| Pixel::new((x, y), color)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// New cases with new deaths stacked on top, one bar per date.
pub struct BarPlottersChart<'a> {
    pub chart: &'a StackedBarChart,
    pub dates: &'a [NaiveDate],
}

impl Widget for BarPlottersChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if too_small(area, buf) {
            return;
        }

        let chart = self.chart;
        let dates = self.dates;
        let n = chart.bars.len();
        if n == 0 {
            return;
        }
        let x0 = -0.5;
        let x1 = n as f64 - 0.5;
        let y1 = chart.y_max as f64 * 1.05;

        let widget = widget_fn(move |root| {
            let mut ctx = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, 0.0..y1)?;

            ctx.configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc("date")
                .y_desc("counts")
                .x_labels(4)
                .y_labels(5)
                .x_label_formatter(&|v| date_label(dates, *v))
                .y_label_formatter(&|v| count_label(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let half = 0.4;
            ctx.draw_series(chart.bars.iter().enumerate().filter(|(_, b)| b.cases > 0).map(|(i, b)| {
                let x = i as f64;
                Rectangle::new([(x - half, 0.0), (x + half, b.cases as f64)], CASES_COLOR.filled())
            }))?;
            ctx.draw_series(chart.bars.iter().enumerate().filter(|(_, b)| b.deaths > 0).map(|(i, b)| {
                let x = i as f64;
                Rectangle::new(
                    [(x - half, b.cases as f64), (x + half, b.total() as f64)],
                    DEATHS_COLOR.filled(),
                )
            }))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Split a polyline into dash segments of width `dash` along x.
///
/// The line is resampled at `dash` steps and every other interval is kept.
pub fn dash_segments(points: &[(f64, f64)], dash: f64) -> Vec<[(f64, f64); 2]> {
    if points.len() < 2 || !dash.is_finite() || dash <= 0.0 {
        return Vec::new();
    }

    let x_end = points[points.len() - 1].0;
    let mut samples = Vec::new();
    let mut seg = 0usize;
    let mut x = points[0].0;
    while x <= x_end {
        while seg + 2 < points.len() && points[seg + 1].0 < x {
            seg += 1;
        }
        let (a, b) = (points[seg], points[seg + 1]);
        let y = if b.0 > a.0 {
            a.1 + (b.1 - a.1) * (x - a.0) / (b.0 - a.0)
        } else {
            a.1
        };
        samples.push((x, y));
        x += dash;
    }

    samples.chunks_exact(2).map(|c| [c[0], c[1]]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashes_alternate_along_x() {
        let segs = dash_segments(&[(0.0, 0.0), (4.0, 8.0)], 1.0);
        // Samples at x = 0,1,2,3,4 -> pairs (0,1), (2,3); x=4 is left over.
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0], [(0.0, 0.0), (1.0, 2.0)]);
        assert_eq!(segs[1], [(2.0, 4.0), (3.0, 6.0)]);
    }

    #[test]
    fn dashes_follow_vertices() {
        let segs = dash_segments(&[(0.0, 0.0), (1.0, 10.0), (2.0, 0.0)], 0.5);
        let ys: Vec<f64> = segs.iter().flat_map(|s| [s[0].1, s[1].1]).collect();
        assert_eq!(ys, vec![0.0, 5.0, 10.0, 5.0]);
    }

    #[test]
    fn degenerate_inputs_give_no_dashes() {
        assert!(dash_segments(&[(0.0, 1.0)], 1.0).is_empty());
        assert!(dash_segments(&[(0.0, 1.0), (1.0, 1.0)], 0.0).is_empty());
    }

    #[test]
    fn date_labels_round_to_rows() {
        let dates = vec![
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
        ];
        assert_eq!(date_label(&dates, 0.4), "2020-01-01");
        assert_eq!(date_label(&dates, 0.6), "2020-01-02");
        assert_eq!(date_label(&dates, 5.0), "");
        assert_eq!(date_label(&dates, -0.5), "");
    }
}
