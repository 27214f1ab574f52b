//! Derived metrics over a single filtered series.
//!
//! - `growth_pct`: day-over-day percent change of new cases
//! - `ma_cases` / `ma_deaths`: trailing moving averages with a partial window
//!   at the start of the series (minimum one row)

use crate::domain::{AugmentedView, DerivedRow, FilteredView};

/// Trailing window length for the moving averages.
pub const MOVING_AVERAGE_WINDOW: usize = 7;

/// Compute derived metrics for a filtered view.
///
/// The input is not modified; rows are copied and re-sorted by date.
pub fn augment(view: &FilteredView) -> AugmentedView {
    let mut records = view.records.clone();
    records.sort_by_key(|r| r.date);

    let new_cases: Vec<f64> = records.iter().map(|r| r.new_cases as f64).collect();
    let new_deaths: Vec<f64> = records.iter().map(|r| r.new_deaths as f64).collect();

    let growth = growth_pct(&new_cases);
    let ma_cases = trailing_mean(&new_cases, MOVING_AVERAGE_WINDOW);
    let ma_deaths = trailing_mean(&new_deaths, MOVING_AVERAGE_WINDOW);

    let rows = records
        .into_iter()
        .enumerate()
        .map(|(i, record)| DerivedRow {
            record,
            growth_pct: growth[i],
            ma_cases: ma_cases[i],
            ma_deaths: ma_deaths[i],
        })
        .collect();

    AugmentedView {
        entity: view.entity.clone(),
        rows,
    }
}

/// Percent change from the previous value.
///
/// The first element has no predecessor and a zero predecessor would divide by
/// zero; both are `None` rather than infinity or zero.
pub fn growth_pct(values: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        if i == 0 {
            out.push(None);
            continue;
        }
        let prev = values[i - 1];
        if prev == 0.0 {
            out.push(None);
            continue;
        }
        let pct = (values[i] - prev) / prev * 100.0;
        out.push(pct.is_finite().then_some(pct));
    }
    out
}

/// Mean of the current value and up to `window - 1` preceding values.
pub fn trailing_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for i in 0..values.len() {
        sum += values[i];
        if i >= window {
            sum -= values[i - window];
        }
        let n = (i + 1).min(window);
        out.push(sum / n as f64);
    }
    out
}

/// Mean of the defined growth values, if any.
pub fn mean_defined(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DateWindow, Record};
    use chrono::NaiveDate;

    fn view(new_cases: &[u64], new_deaths: &[u64]) -> FilteredView {
        let start = NaiveDate::from_ymd_opt(2020, 4, 1).unwrap();
        let records = new_cases
            .iter()
            .zip(new_deaths)
            .enumerate()
            .map(|(i, (&c, &d))| Record {
                entity: "X".to_string(),
                date: start + chrono::Days::new(i as u64),
                new_cases: c,
                cumulative_cases: 0,
                new_deaths: d,
                cumulative_deaths: 0,
            })
            .collect();
        FilteredView {
            entity: "X".to_string(),
            window: DateWindow::default(),
            records,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn three_day_example() {
        let out = augment(&view(&[10, 20, 15], &[0, 0, 0]));
        let growth: Vec<_> = out.rows.iter().map(|r| r.growth_pct).collect();
        assert_eq!(growth[0], None);
        assert!(close(growth[1].unwrap(), 100.0));
        assert!(close(growth[2].unwrap(), -25.0));

        let ma: Vec<_> = out.rows.iter().map(|r| r.ma_cases).collect();
        assert!(close(ma[0], 10.0));
        assert!(close(ma[1], 15.0));
        assert!(close(ma[2], 15.0));
    }

    #[test]
    fn first_row_uses_window_of_one() {
        let out = augment(&view(&[4, 8], &[3, 1]));
        assert!(out.rows[0].growth_pct.is_none());
        assert!(close(out.rows[0].ma_cases, 4.0));
        assert!(close(out.rows[0].ma_deaths, 3.0));
    }

    #[test]
    fn zero_predecessor_is_undefined() {
        let g = growth_pct(&[0.0, 5.0, 0.0, 0.0, 2.0]);
        assert_eq!(g[1], None);
        assert!(close(g[2].unwrap(), -100.0));
        assert_eq!(g[3], None);
        assert_eq!(g[4], None);
    }

    #[test]
    fn moving_average_drops_old_values_after_seven_rows() {
        let values: Vec<f64> = (1..=9).map(f64::from).collect();
        let ma = trailing_mean(&values, 7);
        assert!(close(ma[6], 4.0)); // mean(1..=7)
        assert!(close(ma[7], 5.0)); // mean(2..=8)
        assert!(close(ma[8], 6.0)); // mean(3..=9)
    }

    #[test]
    fn augment_does_not_touch_input_and_sorts_copy() {
        let mut input = view(&[1, 2, 3], &[0, 0, 0]);
        input.records.reverse();
        let before = input.clone();
        let out = augment(&input);
        assert_eq!(input, before);
        assert!(out.rows.windows(2).all(|w| w[0].record.date < w[1].record.date));
        assert_eq!(out.rows[0].record.new_cases, 1);
    }

    #[test]
    fn mean_defined_skips_none() {
        assert_eq!(mean_defined([None, Some(100.0), Some(-25.0)]), Some(37.5));
        assert_eq!(mean_defined([None, None]), None);
    }

    #[test]
    fn empty_view_augments_to_empty() {
        let out = augment(&view(&[], &[]));
        assert!(out.is_empty());
    }
}
