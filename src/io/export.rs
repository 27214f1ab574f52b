//! Export the analysis summary to a plain-text file.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::AppError;
use crate::report::{Summary, format_summary};

/// Write the six-line summary to `path`, replacing any existing file.
pub fn write_summary(path: &Path, summary: &Summary) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::file_access(format!("Failed to create '{}': {e}", path.display())))?;

    file.write_all(format_summary(summary).as_bytes())
        .map_err(|e| AppError::file_access(format!("Failed to write analysis: {e}")))?;

    tracing::info!(path = %path.display(), entity = %summary.entity, "analysis exported");
    Ok(())
}
