//! Entity/date-window filtering.

use crate::domain::{Dataset, DateWindow, FilteredView};
use crate::error::AppError;
use crate::io::ingest::parse_date;

/// Raw user query as typed into the UI or passed on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub entity: String,
    pub from: String,
    pub to: String,
}

impl Selection {
    pub fn new(entity: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Parse the optional from/to strings. Blank means unbounded.
pub fn parse_window(from: &str, to: &str) -> Result<DateWindow, AppError> {
    Ok(DateWindow {
        from: parse_bound(from)?,
        to: parse_bound(to)?,
    })
}

fn parse_bound(s: &str) -> Result<Option<chrono::NaiveDate>, AppError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    parse_date(s)
        .map(Some)
        .ok_or_else(|| AppError::validation("Invalid date format. Use YYYY-MM-DD."))
}

/// Narrow `dataset` to the selected entity and inclusive date window.
///
/// The result may be empty; callers decide whether that is a notice.
pub fn filter_dataset(dataset: &Dataset, selection: &Selection) -> Result<FilteredView, AppError> {
    let entity = selection.entity.trim();
    if entity.is_empty() {
        return Err(AppError::validation("Please select a country."));
    }
    let window = parse_window(&selection.from, &selection.to)?;

    let mut records: Vec<_> = dataset
        .records()
        .iter()
        .filter(|r| r.entity == entity && window.contains(r.date))
        .cloned()
        .collect();
    // Already date-ordered from the loader; re-asserted here.
    records.sort_by_key(|r| r.date);

    tracing::debug!(entity, window = %window, rows = records.len(), "filtered dataset");

    Ok(FilteredView {
        entity: entity.to_string(),
        window,
        records,
    })
}
