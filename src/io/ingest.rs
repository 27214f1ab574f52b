//! CSV ingest and normalization.
//!
//! This module turns the daily case/death CSV into a clean, sorted `Dataset`.
//!
//! Design goals:
//! - **Never fatal**: a missing or unreadable file yields an empty dataset plus
//!   a notice, so the UI can still start
//! - **Row-level leniency**: bad dates and blank countries drop the row, bad
//!   counts become zero
//! - **Deterministic behavior**: loading the same file twice yields identical rows

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;
use serde::Deserialize;

use crate::domain::{Dataset, Record};
use crate::error::AppError;

/// Normalized (trimmed, BOM-stripped, lowercase) names of the columns we read.
const REQUIRED_COLUMNS: [&str; 6] = [
    "country",
    "date_reported",
    "new_cases",
    "cumulative_cases",
    "new_deaths",
    "cumulative_deaths",
];

/// One CSV row before coercion. Every field is text so a bad count never
/// rejects the row; extra columns (`Country_code`, `WHO_region`) are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRow {
    country: String,
    date_reported: String,
    new_cases: String,
    cumulative_cases: String,
    new_deaths: String,
    cumulative_deaths: String,
}

/// Counters describing what happened during a load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    /// Rows dropped: unparseable date, blank country, or malformed CSV record.
    pub rows_dropped: usize,
}

/// Loader output: the dataset, its counters, and an optional notice.
///
/// `notice` is set when the file could not be read at all; the dataset is then
/// empty and the caller is expected to surface the notice to the user.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub dataset: Dataset,
    pub report: LoadReport,
    pub notice: Option<AppError>,
}

/// Load the dataset at `path`. Never fails; read errors become a notice.
pub fn load_dataset(path: &Path) -> LoadOutcome {
    match read_dataset(path) {
        Ok((dataset, report)) => {
            tracing::info!(
                path = %path.display(),
                rows_read = report.rows_read,
                rows_kept = report.rows_kept,
                rows_dropped = report.rows_dropped,
                "dataset loaded"
            );
            LoadOutcome {
                dataset,
                report,
                notice: None,
            }
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "dataset load failed");
            LoadOutcome {
                dataset: Dataset::empty(),
                report: LoadReport::default(),
                notice: Some(err),
            }
        }
    }
}

/// Read and normalize the CSV, propagating file-level failures.
pub fn read_dataset(path: &Path) -> Result<(Dataset, LoadReport), AppError> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::file_access(format!("Data file not found: {}", path.display()))
        } else {
            AppError::file_access(format!("Failed to load data: {e}"))
        }
    })?;
    read_from(file)
}

/// Parse CSV from any reader. An I/O failure part-way through discards the
/// rows read so far.
fn read_from<R: std::io::Read>(source: R) -> Result<(Dataset, LoadReport), AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::file_access(format!("Failed to load data: {e}")))?;
    let headers = normalize_headers(headers);
    ensure_required_columns_exist(&headers)?;
    reader.set_headers(headers);

    let mut records = Vec::new();
    let mut report = LoadReport::default();

    for result in reader.deserialize::<RawRow>() {
        report.rows_read += 1;

        let raw = match result {
            Ok(r) => r,
            Err(e) if e.is_io_error() => {
                return Err(AppError::file_access(format!("Failed to load data: {e}")));
            }
            Err(e) => {
                tracing::debug!(error = %e, "skipping malformed CSV record");
                report.rows_dropped += 1;
                continue;
            }
        };

        match parse_row(raw) {
            Some(row) => records.push(row),
            None => report.rows_dropped += 1,
        }
    }

    report.rows_kept = records.len();
    Ok((Dataset::new(records), report))
}

fn normalize_headers(headers: &StringRecord) -> StringRecord {
    headers.iter().map(normalize_header_name).collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(headers: &StringRecord) -> Result<(), AppError> {
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(AppError::file_access(format!(
                "Failed to load data: missing required column `{col}`"
            )));
        }
    }
    Ok(())
}

/// Coerce one row. Returns `None` when the date is unusable or the country is blank.
fn parse_row(raw: RawRow) -> Option<Record> {
    let date = parse_date(&raw.date_reported)?;
    let entity = raw.country.trim();
    if entity.is_empty() {
        return None;
    }

    Some(Record {
        entity: entity.to_string(),
        date,
        new_cases: parse_count(&raw.new_cases),
        cumulative_cases: parse_count(&raw.cumulative_cases),
        new_deaths: parse_count(&raw.new_deaths),
        cumulative_deaths: parse_count(&raw.cumulative_deaths),
    })
}

/// Parse a calendar date, discarding any time-of-day suffix.
///
/// ISO dates are what the dataset ships with. Day-first-or-month-first forms
/// are read month-first (`03/04/2020` is March 4th); day-first is only tried
/// when that fails, e.g. `15/03/2020`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    const FMTS: [&str; 6] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%m-%d-%Y", "%d-%m-%Y"];

    let s = s.trim();
    let date_part = s.split(['T', ' ']).next().unwrap_or(s);
    if date_part.is_empty() {
        return None;
    }
    FMTS.iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Parse a count column. Unparseable values become zero and negatives clamp to zero.
fn parse_count(s: &str) -> u64 {
    let s = s.trim();
    if s.is_empty() {
        return 0;
    }
    if let Ok(v) = s.parse::<i64>() {
        return v.max(0) as u64;
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v.trunc() as u64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    const HEADER: &str = "Date_reported,Country_code,Country,WHO_region,New_cases,Cumulative_cases,New_deaths,Cumulative_deaths\n";

    fn write_csv(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("data.csv");
        let mut f = File::create(&path).unwrap();
        f.write_all(HEADER.as_bytes()).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn parse_date_accepts_common_forms() {
        let want = NaiveDate::from_ymd_opt(2020, 3, 15).unwrap();
        assert_eq!(parse_date("2020-03-15"), Some(want));
        assert_eq!(parse_date("2020/03/15"), Some(want));
        assert_eq!(parse_date("15/03/2020"), Some(want));
        assert_eq!(parse_date("15-03-2020"), Some(want));
        assert_eq!(parse_date("2020-03-15 00:00:00"), Some(want));
        assert_eq!(parse_date("2020-03-15T12:30:00Z"), Some(want));
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2020-02-30"), None);
    }

    #[test]
    fn parse_date_reads_ambiguous_forms_month_first() {
        let d = |m, day| NaiveDate::from_ymd_opt(2020, m, day).unwrap();
        assert_eq!(parse_date("03/04/2020"), Some(d(3, 4)));
        assert_eq!(parse_date("3/15/2020"), Some(d(3, 15)));
        assert_eq!(parse_date("03-04-2020"), Some(d(3, 4)));
        // Month 15 is impossible, so this falls back to day-first.
        assert_eq!(parse_date("15/03/2020"), Some(d(3, 15)));
    }

    #[test]
    fn blank_country_rows_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            concat!(
                "2020-01-01,XX,,OTHER,5,5,0,0
",
                "2020-01-01,XX,   ,OTHER,5,5,0,0
",
                "2020-01-01,PE,Peru,AMRO,1,1,0,0
",
            ),
        );
        let outcome = load_dataset(&path);
        assert_eq!(outcome.report.rows_read, 3);
        assert_eq!(outcome.report.rows_dropped, 2);
        assert_eq!(outcome.dataset.entities(), vec!["Peru".to_string()]);
    }

    #[test]
    fn parse_count_coerces_to_non_negative_integers() {
        assert_eq!(parse_count("42"), 42);
        assert_eq!(parse_count(" 7 "), 7);
        assert_eq!(parse_count("12.9"), 12);
        assert_eq!(parse_count("-5"), 0);
        assert_eq!(parse_count("abc"), 0);
        assert_eq!(parse_count("NaN"), 0);
        assert_eq!(parse_count(""), 0);
    }

    #[test]
    fn load_drops_bad_dates_trims_entities_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            concat!(
                "2020-01-05,PE, Peru ,AMRO,3,10,1,2\n",
                "2020-01-04,PE,Peru,AMRO,7,7,x,1\n",
                "garbage,CL,Chile,AMRO,1,1,0,0\n",
                "2020-01-04,CL,Chile,AMRO,,5,0,0\n",
            ),
        );

        let outcome = load_dataset(&path);
        assert!(outcome.notice.is_none());
        assert_eq!(outcome.report.rows_read, 4);
        assert_eq!(outcome.report.rows_kept, 3);
        assert_eq!(outcome.report.rows_dropped, 1);

        let rows = outcome.dataset.records();
        assert_eq!(rows[0].entity, "Chile");
        assert_eq!(rows[0].new_cases, 0);
        assert_eq!(rows[1].entity, "Peru");
        assert_eq!(rows[1].date, NaiveDate::from_ymd_opt(2020, 1, 4).unwrap());
        assert_eq!(rows[1].new_deaths, 0);
        assert_eq!(rows[2].entity, "Peru");
        assert_eq!(rows[2].cumulative_cases, 10);
    }

    #[test]
    fn loading_twice_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "2020-01-02,PE,Peru,AMRO,3,10,1,2\n2020-01-01,PE,Peru,AMRO,7,7,1,1\n",
        );
        let a = load_dataset(&path);
        let b = load_dataset(&path);
        assert_eq!(a.dataset, b.dataset);
        assert_eq!(a.report, b.report);
    }

    #[test]
    fn missing_file_yields_empty_dataset_and_notice() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = load_dataset(&dir.path().join("nope.csv"));
        assert!(outcome.dataset.is_empty());
        let notice = outcome.notice.expect("notice");
        assert_eq!(notice.kind(), crate::error::ErrorKind::FileAccess);
        assert!(notice.message().starts_with("Data file not found"));
    }

    #[test]
    fn missing_column_is_a_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "Country,Date_reported\nPeru,2020-01-01\n").unwrap();
        let outcome = load_dataset(&path);
        assert!(outcome.dataset.is_empty());
        assert!(outcome.notice.is_some());
    }

    #[test]
    fn headers_match_case_insensitively_with_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bom.csv");
        std::fs::write(
            &path,
            "\u{feff}DATE_REPORTED,country,NEW_CASES,cumulative_cases,New_Deaths,CUMULATIVE_DEATHS\n2020-01-01,Peru,1,1,0,0\n",
        )
        .unwrap();
        let outcome = load_dataset(&path);
        assert!(outcome.notice.is_none());
        assert_eq!(outcome.dataset.len(), 1);
    }

    /// Serves `data`, then fails every later read.
    struct BrokenAfter {
        data: std::io::Cursor<Vec<u8>>,
    }

    impl std::io::Read for BrokenAfter {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = self.data.read(buf)?;
            if n == 0 {
                return Err(std::io::Error::other("device went away"));
            }
            Ok(n)
        }
    }

    #[test]
    fn io_error_mid_stream_fails_the_whole_load() {
        let body = format!("{HEADER}2020-01-01,PE,Peru,AMRO,1,1,0,0\n2020-01-02,PE,Peru,AMRO,2,3,0,0\n");
        let source = BrokenAfter {
            data: std::io::Cursor::new(body.into_bytes()),
        };
        let err = read_from(source).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::FileAccess);
        assert!(err.message().starts_with("Failed to load data"));
    }
}
