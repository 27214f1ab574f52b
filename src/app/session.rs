//! Per-login session state.
//!
//! The export works on whatever chart was produced last, so the session keeps
//! exactly one augmented view. It is owned by the front-end and passed to the
//! pipeline explicitly.

use std::path::Path;

use crate::domain::AugmentedView;
use crate::error::AppError;
use crate::report::Summary;

#[derive(Debug, Clone)]
pub struct Session {
    username: String,
    last_view: Option<AugmentedView>,
}

impl Session {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            last_view: None,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Replace the retained view with the one just charted.
    pub fn record(&mut self, view: AugmentedView) {
        self.last_view = Some(view);
    }

    pub fn last_view(&self) -> Option<&AugmentedView> {
        self.last_view.as_ref()
    }

    /// Summary of the last charted view; fails if nothing was charted yet.
    pub fn summary(&self) -> Result<Summary, AppError> {
        match &self.last_view {
            Some(view) if !view.is_empty() => crate::report::summarize(view),
            _ => Err(AppError::precondition("Please plot data first.")),
        }
    }

    /// Write the summary to `path`. No file is created when nothing was charted.
    pub fn export(&self, path: &Path) -> Result<Summary, AppError> {
        let summary = self.summary()?;
        crate::io::export::write_summary(path, &summary)?;
        Ok(summary)
    }
}
