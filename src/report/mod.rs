//! Presentation adapter: shapes an augmented view into chart data and a summary.
//!
//! Nothing here draws. The TUI widget and the ASCII renderer both consume the
//! structs built here, so chart math is testable without a terminal.

use chrono::NaiveDate;

use crate::analysis::mean_defined;
use crate::domain::AugmentedView;
use crate::error::AppError;

pub mod format;

pub use format::*;

const NO_DATA: &str = "No records found for this selection.";

/// Series for the trend chart. X is the row index; `dates[i]` labels it.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendChart {
    pub entity: String,
    pub dates: Vec<NaiveDate>,
    pub new_cases: Vec<(f64, f64)>,
    pub new_deaths: Vec<(f64, f64)>,
    /// Drawn dashed.
    pub ma_cases: Vec<(f64, f64)>,
    /// Drawn dashed.
    pub ma_deaths: Vec<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

/// One stacked bar: cases from zero, deaths stacked on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackedBar {
    pub date: NaiveDate,
    pub cases: u64,
    pub deaths: u64,
}

impl StackedBar {
    pub fn total(&self) -> u64 {
        self.cases.saturating_add(self.deaths)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StackedBarChart {
    pub entity: String,
    pub bars: Vec<StackedBar>,
    /// Tallest stack (at least 1 so the axis never collapses).
    pub y_max: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: &'static str,
    pub value: u64,
    pub share_pct: f64,
}

/// Two-slice split of the latest cumulative totals.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionChart {
    pub entity: String,
    pub as_of: NaiveDate,
    pub slices: [Slice; 2],
}

/// Figures written by the "save analysis" export.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub entity: String,
    pub rows: usize,
    pub total_cases: u64,
    pub total_deaths: u64,
    pub avg_daily_cases: f64,
    /// `None` when no row has a defined growth value.
    pub avg_growth_pct: Option<f64>,
}

pub fn trend_chart(view: &AugmentedView) -> Result<TrendChart, AppError> {
    if view.is_empty() {
        return Err(AppError::empty_selection(NO_DATA));
    }

    let indexed = |f: fn(&crate::domain::DerivedRow) -> f64| -> Vec<(f64, f64)> {
        view.rows.iter().enumerate().map(|(i, r)| (i as f64, f(r))).collect()
    };

    let new_cases = indexed(|r| r.record.new_cases as f64);
    let new_deaths = indexed(|r| r.record.new_deaths as f64);
    let ma_cases = indexed(|r| r.ma_cases);
    let ma_deaths = indexed(|r| r.ma_deaths);

    let last = (view.len() - 1) as f64;
    let x_bounds = if last > 0.0 { [0.0, last] } else { [-0.5, 0.5] };

    let y_max = [&new_cases, &new_deaths, &ma_cases, &ma_deaths]
        .iter()
        .flat_map(|s| s.iter().map(|&(_, y)| y))
        .fold(0.0_f64, f64::max);
    let y_max = if y_max > 0.0 { y_max } else { 1.0 };
    let pad = y_max * 0.05;
    let y_bounds = [-pad, y_max + pad];

    Ok(TrendChart {
        entity: view.entity.clone(),
        dates: view.dates(),
        new_cases,
        new_deaths,
        ma_cases,
        ma_deaths,
        x_bounds,
        y_bounds,
    })
}

pub fn stacked_bar_chart(view: &AugmentedView) -> Result<StackedBarChart, AppError> {
    if view.is_empty() {
        return Err(AppError::empty_selection(NO_DATA));
    }

    let bars: Vec<StackedBar> = view
        .rows
        .iter()
        .map(|r| StackedBar {
            date: r.record.date,
            cases: r.record.new_cases,
            deaths: r.record.new_deaths,
        })
        .collect();
    let y_max = bars.iter().map(StackedBar::total).max().unwrap_or(0).max(1);

    Ok(StackedBarChart {
        entity: view.entity.clone(),
        bars,
        y_max,
    })
}

/// Uses only the last row's cumulative values.
pub fn composition_chart(view: &AugmentedView) -> Result<CompositionChart, AppError> {
    let Some(last) = view.last() else {
        return Err(AppError::empty_selection(NO_DATA));
    };

    let cases = last.record.cumulative_cases;
    let deaths = last.record.cumulative_deaths;
    let active = cases.saturating_sub(deaths);
    let total = active.saturating_add(deaths);

    let share = |v: u64| {
        if total == 0 {
            0.0
        } else {
            v as f64 / total as f64 * 100.0
        }
    };

    Ok(CompositionChart {
        entity: view.entity.clone(),
        as_of: last.record.date,
        slices: [
            Slice {
                label: "Recovered/Active",
                value: active,
                share_pct: share(active),
            },
            Slice {
                label: "Deaths",
                value: deaths,
                share_pct: share(deaths),
            },
        ],
    })
}

pub fn summarize(view: &AugmentedView) -> Result<Summary, AppError> {
    let Some(last) = view.last() else {
        return Err(AppError::precondition("Please plot data first."));
    };

    let total_new: f64 = view.rows.iter().map(|r| r.record.new_cases as f64).sum();

    Ok(Summary {
        entity: view.entity.clone(),
        rows: view.len(),
        total_cases: last.record.cumulative_cases,
        total_deaths: last.record.cumulative_deaths,
        avg_daily_cases: total_new / view.len() as f64,
        avg_growth_pct: mean_defined(view.rows.iter().map(|r| r.growth_pct)),
    })
}
