//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - built once by the loader and shared read-only
//! - copied into per-query views
//! - shaped into chart series or a text summary

use std::collections::BTreeSet;

use chrono::NaiveDate;
use clap::ValueEnum;

/// One row of the daily dataset.
///
/// Cumulative counts are expected to be non-decreasing per entity, but upstream
/// data does not always respect that and no repair is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub entity: String,
    pub date: NaiveDate,
    pub new_cases: u64,
    pub cumulative_cases: u64,
    pub new_deaths: u64,
    pub cumulative_deaths: u64,
}

/// All loaded records, ordered by `(entity, date)` ascending.
///
/// Built once at startup and never mutated afterwards; filtering copies rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Build a dataset, sorting records by `(entity, date)`.
    pub fn new(mut records: Vec<Record>) -> Self {
        records.sort_by(|a, b| a.entity.cmp(&b.entity).then(a.date.cmp(&b.date)));
        Self { records }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct entity names in sorted order (feeds the entity selector).
    pub fn entities(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.entity.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

/// Inclusive date bounds; `None` means unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateWindow {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

impl std::fmt::Display for DateWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let from = self.from.map(|d| d.to_string()).unwrap_or_else(|| "start".to_string());
        let to = self.to.map(|d| d.to_string()).unwrap_or_else(|| "end".to_string());
        write!(f, "{from}..{to}")
    }
}

/// Rows for exactly one entity inside a date window, sorted by date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredView {
    pub entity: String,
    pub window: DateWindow,
    pub records: Vec<Record>,
}

impl FilteredView {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A record plus the metrics derived from its position in the series.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedRow {
    pub record: Record,
    /// Day-over-day change of `new_cases` in percent.
    ///
    /// `None` on the first row and whenever the previous day had zero new cases.
    pub growth_pct: Option<f64>,
    /// Trailing 7-row mean of `new_cases` (shorter window at the series start).
    pub ma_cases: f64,
    /// Trailing 7-row mean of `new_deaths`.
    pub ma_deaths: f64,
}

/// A filtered view augmented with derived metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedView {
    pub entity: String,
    pub rows: Vec<DerivedRow>,
}

impl AugmentedView {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<&DerivedRow> {
        self.rows.last()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.record.date).collect()
    }
}

/// The three chart forms offered by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChartKind {
    /// New cases/deaths with 7-day moving averages.
    Trend,
    /// New cases stacked beneath new deaths per date.
    Bar,
    /// Two-slice share of the latest cumulative totals.
    Composition,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Trend, ChartKind::Bar, ChartKind::Composition];

    pub fn display_name(self) -> &'static str {
        match self {
            ChartKind::Trend => "Trend",
            ChartKind::Bar => "Bar",
            ChartKind::Composition => "Composition",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(entity: &str, day: u32) -> Record {
        Record {
            entity: entity.to_string(),
            date: NaiveDate::from_ymd_opt(2021, 3, day).unwrap(),
            new_cases: 0,
            cumulative_cases: 0,
            new_deaths: 0,
            cumulative_deaths: 0,
        }
    }

    #[test]
    fn dataset_sorts_by_entity_then_date() {
        let ds = Dataset::new(vec![rec("Peru", 2), rec("Chile", 5), rec("Peru", 1), rec("Chile", 3)]);
        let keys: Vec<(&str, u32)> = ds
            .records()
            .iter()
            .map(|r| (r.entity.as_str(), chrono::Datelike::day(&r.date)))
            .collect();
        assert_eq!(keys, vec![("Chile", 3), ("Chile", 5), ("Peru", 1), ("Peru", 2)]);
        assert_eq!(ds.entities(), vec!["Chile".to_string(), "Peru".to_string()]);
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let d = |day| NaiveDate::from_ymd_opt(2021, 3, day).unwrap();
        let w = DateWindow {
            from: Some(d(2)),
            to: Some(d(4)),
        };
        assert!(!w.contains(d(1)));
        assert!(w.contains(d(2)));
        assert!(w.contains(d(4)));
        assert!(!w.contains(d(5)));
        assert!(DateWindow::default().contains(d(31)));
    }
}
