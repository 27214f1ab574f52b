//! Shared "chart pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! filter -> empty check -> derived metrics -> chart shaping
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::analysis::{Selection, augment, filter_dataset};
use crate::app::session::Session;
use crate::domain::{AugmentedView, ChartKind, Dataset};
use crate::error::AppError;
use crate::report::{
    CompositionChart, StackedBarChart, TrendChart, composition_chart, stacked_bar_chart, trend_chart,
};

/// Shaped data for one of the three chart forms.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Trend(TrendChart),
    Bar(StackedBarChart),
    Composition(CompositionChart),
}

impl ChartData {
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartData::Trend(_) => ChartKind::Trend,
            ChartData::Bar(_) => ChartKind::Bar,
            ChartData::Composition(_) => ChartKind::Composition,
        }
    }
}

/// Filter and augment. An empty selection is reported before any metric runs.
pub fn select_view(dataset: &Dataset, selection: &Selection) -> Result<AugmentedView, AppError> {
    let view = filter_dataset(dataset, selection)?;
    if view.is_empty() {
        return Err(AppError::empty_selection("No records found for this selection."));
    }
    Ok(augment(&view))
}

/// Shape an augmented view into the requested chart.
pub fn shape_chart(view: &AugmentedView, kind: ChartKind) -> Result<ChartData, AppError> {
    Ok(match kind {
        ChartKind::Trend => ChartData::Trend(trend_chart(view)?),
        ChartKind::Bar => ChartData::Bar(stacked_bar_chart(view)?),
        ChartKind::Composition => ChartData::Composition(composition_chart(view)?),
    })
}

/// Produce a chart and retain its view in the session for a later export.
pub fn produce_chart(
    dataset: &Dataset,
    selection: &Selection,
    kind: ChartKind,
    session: &mut Session,
) -> Result<ChartData, AppError> {
    let view = select_view(dataset, selection)?;
    let chart = shape_chart(&view, kind)?;
    tracing::info!(
        entity = %view.entity,
        rows = view.len(),
        chart = kind.display_name(),
        "chart produced"
    );
    session.record(view);
    Ok(chart)
}
