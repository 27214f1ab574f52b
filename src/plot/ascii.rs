//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual checks from the `chart` subcommand
//! - deterministic output (helpful for golden tests)
//!
//! Trend plot elements:
//! - new cases: `o`, new deaths: `x`
//! - 7-day averages: `.` (cases) and `:` (deaths) lines
//!
//! Bar plot elements: `#` new cases, `+` new deaths stacked on top.

use crate::report::{CompositionChart, StackedBarChart, TrendChart, format_composition};

const MIN_WIDTH: usize = 10;
const MIN_HEIGHT: usize = 5;

/// Render the trend chart.
pub fn render_trend(chart: &TrendChart, width: usize, height: usize) -> String {
    let width = width.max(MIN_WIDTH);
    let height = height.max(MIN_HEIGHT);
    let [x_min, x_max] = chart.x_bounds;
    let [y_min, y_max] = chart.y_bounds;

    let mut grid = vec![vec![' '; width]; height];

    // Averages first so observations overlay them.
    draw_polyline(&mut grid, &chart.ma_cases, x_min, x_max, y_min, y_max, '.');
    draw_polyline(&mut grid, &chart.ma_deaths, x_min, x_max, y_min, y_max, ':');

    for (series, ch) in [(&chart.new_cases, 'o'), (&chart.new_deaths, 'x')] {
        for &(x, y) in series.iter() {
            let col = map_x(x, x_min, x_max, width);
            let row = map_y(y, y_min, y_max, height);
            grid[row][col] = ch;
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Trend: {} | {} | y=[{:.0}, {:.0}]\n",
        chart.entity,
        date_span(chart.dates.first(), chart.dates.last()),
        y_min.max(0.0),
        y_max
    ));
    push_grid(&mut out, grid);
    out.push_str("o new cases  x new deaths  . 7-day avg cases  : 7-day avg deaths\n");
    out
}

/// Render the stacked bar chart. Bars that land on the same column overwrite.
pub fn render_bars(chart: &StackedBarChart, width: usize, height: usize) -> String {
    let width = width.max(MIN_WIDTH);
    let height = height.max(MIN_HEIGHT);
    let n = chart.bars.len();
    let y_max = chart.y_max.max(1) as f64;

    let mut grid = vec![vec![' '; width]; height];

    for (i, bar) in chart.bars.iter().enumerate() {
        let col = if n <= 1 {
            0
        } else {
            map_x(i as f64, 0.0, (n - 1) as f64, width)
        };
        let cases_h = bar_height(bar.cases as f64, y_max, height);
        let total_h = bar_height(bar.total() as f64, y_max, height);

        for (k, row) in grid.iter_mut().rev().enumerate().take(total_h) {
            row[col] = if k < cases_h { '#' } else { '+' };
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Bar: {} | {} | y=[0, {}]\n",
        chart.entity,
        date_span(chart.bars.first().map(|b| &b.date), chart.bars.last().map(|b| &b.date)),
        chart.y_max
    ));
    push_grid(&mut out, grid);
    out.push_str("# new cases  + new deaths\n");
    out
}

/// Render the composition as a proportion bar followed by the slice lines.
pub fn render_composition(chart: &CompositionChart, width: usize) -> String {
    let width = width.max(MIN_WIDTH);
    let first = ((chart.slices[0].share_pct / 100.0) * width as f64).round() as usize;
    let second = ((chart.slices[1].share_pct / 100.0) * width as f64).round() as usize;
    let first = first.min(width);
    let second = second.min(width - first);

    let mut out = String::new();
    out.push('[');
    out.push_str(&"#".repeat(first));
    out.push_str(&"+".repeat(second));
    out.push_str(&" ".repeat(width - first - second));
    out.push_str("]\n");
    out.push_str(&format_composition(chart));
    out
}

fn date_span(first: Option<&chrono::NaiveDate>, last: Option<&chrono::NaiveDate>) -> String {
    match (first, last) {
        (Some(a), Some(b)) => format!("{a}..{b}"),
        _ => "-".to_string(),
    }
}

fn push_grid(out: &mut String, grid: Vec<Vec<char>>) {
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
}

fn bar_height(value: f64, y_max: f64, height: usize) -> usize {
    if value <= 0.0 {
        return 0;
    }
    ((value / y_max) * height as f64).round().clamp(1.0, height as f64) as usize
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    if x_max <= x_min {
        return 0;
    }
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    if y_max <= y_min {
        return height - 1;
    }
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_polyline(
    grid: &mut [Vec<char>],
    points: &[(f64, f64)],
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    ch: char,
) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in points {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        match prev {
            Some((c0, r0)) => draw_line(grid, c0, r0, col, row, ch),
            None if grid[row][col] == ' ' => grid[row][col] = ch,
            None => {}
        }
        prev = Some((col, row));
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
    use crate::report::{Slice, StackedBar};
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 1, day).unwrap()
    }

    #[test]
    fn bars_golden_snapshot_small() {
        let chart = StackedBarChart {
            entity: "Fiji".to_string(),
            bars: vec![
                StackedBar {
                    date: d(1),
                    cases: 2,
                    deaths: 2,
                },
                StackedBar {
                    date: d(2),
                    cases: 4,
                    deaths: 0,
                },
            ],
            y_max: 4,
        };

        let txt = render_bars(&chart, 10, 5);
        let expected = concat!(
            "Bar: Fiji | 2022-01-01..2022-01-02 | y=[0, 4]\n",
            "+        #\n",
            "+        #\n",
            "#        #\n",
            "#        #\n",
            "#        #\n",
            "# new cases  + new deaths\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn trend_places_points_at_corners() {
        let chart = TrendChart {
            entity: "Fiji".to_string(),
            dates: vec![d(1), d(2)],
            new_cases: vec![(0.0, 0.0), (1.0, 10.0)],
            new_deaths: vec![(0.0, 0.0), (1.0, 0.0)],
            ma_cases: vec![(0.0, 0.0), (1.0, 5.0)],
            ma_deaths: vec![(0.0, 0.0), (1.0, 0.0)],
            x_bounds: [0.0, 1.0],
            y_bounds: [0.0, 10.0],
        };
        let txt = render_trend(&chart, 10, 5);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[0], "Trend: Fiji | 2022-01-01..2022-01-02 | y=[0, 10]");
        // Top-right: the 10-case day.
        assert_eq!(lines[1].chars().nth(9), Some('o'));
        // Bottom row: deaths overwrite cases at x=0, and x=9 has the zero-death day.
        assert_eq!(lines[5].chars().next(), Some('x'));
        assert_eq!(lines[5].chars().nth(9), Some('x'));
        assert!(lines[3].contains('.'));
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn composition_bar_proportions() {
        let chart = CompositionChart {
            entity: "Fiji".to_string(),
            as_of: d(2),
            slices: [
                Slice {
                    label: "Recovered/Active",
                    value: 75,
                    share_pct: 75.0,
                },
                Slice {
                    label: "Deaths",
                    value: 25,
                    share_pct: 25.0,
                },
            ],
        };
        let txt = render_composition(&chart, 20);
        assert!(txt.starts_with("[###############+++++]\n"));
        assert!(txt.contains("Deaths: 25 (25.0%)"));
    }
}
