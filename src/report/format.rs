//! Formatted text output.
//!
//! We keep formatting code in one place so output changes are localized and
//! the exported summary can be golden-tested.

use crate::io::ingest::LoadReport;
use crate::report::{CompositionChart, Summary};

/// The six-line analysis text written by the export.
pub fn format_summary(summary: &Summary) -> String {
    let growth = summary
        .avg_growth_pct
        .map(|g| format!("{g:.2}"))
        .unwrap_or_else(|| "n/a".to_string());

    let mut out = String::new();
    out.push_str(&format!("COVID Analysis - {}\n", summary.entity));
    out.push_str(&format!("Rows used: {}\n", summary.rows));
    out.push_str(&format!("Total Cases: {}\n", summary.total_cases));
    out.push_str(&format!("Total Deaths: {}\n", summary.total_deaths));
    out.push_str(&format!("Average Daily Cases: {:.2}\n", summary.avg_daily_cases));
    out.push_str(&format!("Average Daily Growth %: {growth}\n"));
    out
}

/// One line per slice, e.g. `Deaths: 20 (20.0%)`.
pub fn format_composition(chart: &CompositionChart) -> String {
    let mut out = String::new();
    out.push_str(&format!("Composition: {} (as of {})\n", chart.entity, chart.as_of));
    for slice in &chart.slices {
        out.push_str(&format!(
            "  {}: {} ({:.1}%)\n",
            slice.label, slice.value, slice.share_pct
        ));
    }
    out
}

pub fn format_load_report(report: &LoadReport, entities: usize) -> String {
    format!(
        "Loaded {} row(s) for {entities} countr{} ({} dropped).",
        report.rows_kept,
        if entities == 1 { "y" } else { "ies" },
        report.rows_dropped,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Slice;
    use chrono::NaiveDate;

    #[test]
    fn summary_golden() {
        let summary = Summary {
            entity: "Fiji".to_string(),
            rows: 3,
            total_cases: 45,
            total_deaths: 1,
            avg_daily_cases: 15.0,
            avg_growth_pct: Some(37.5),
        };
        let expected = concat!(
            "COVID Analysis - Fiji\n",
            "Rows used: 3\n",
            "Total Cases: 45\n",
            "Total Deaths: 1\n",
            "Average Daily Cases: 15.00\n",
            "Average Daily Growth %: 37.50\n",
        );
        assert_eq!(format_summary(&summary), expected);
    }

    #[test]
    fn summary_without_growth_says_na() {
        let summary = Summary {
            entity: "Fiji".to_string(),
            rows: 1,
            total_cases: 0,
            total_deaths: 0,
            avg_daily_cases: 0.0,
            avg_growth_pct: None,
        };
        let text = format_summary(&summary);
        assert_eq!(text.lines().count(), 6);
        assert!(text.ends_with("Average Daily Growth %: n/a\n"));
    }

    #[test]
    fn composition_lines() {
        let chart = CompositionChart {
            entity: "Fiji".to_string(),
            as_of: NaiveDate::from_ymd_opt(2022, 1, 2).unwrap(),
            slices: [
                Slice {
                    label: "Recovered/Active",
                    value: 80,
                    share_pct: 80.0,
                },
                Slice {
                    label: "Deaths",
                    value: 20,
                    share_pct: 20.0,
                },
            ],
        };
        let text = format_composition(&chart);
        assert!(text.contains("Recovered/Active: 80 (80.0%)"));
        assert!(text.contains("Deaths: 20 (20.0%)"));
    }

    #[test]
    fn load_report_pluralizes() {
        let report = LoadReport {
            rows_read: 5,
            rows_kept: 4,
            rows_dropped: 1,
        };
        assert_eq!(format_load_report(&report, 1), "Loaded 4 row(s) for 1 country (1 dropped).");
        assert_eq!(format_load_report(&report, 2), "Loaded 4 row(s) for 2 countries (1 dropped).");
    }
}
