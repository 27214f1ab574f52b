//! "Remember me" username file.
//!
//! Holds a single username, or is absent when remembering is off.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct RememberedUser {
    path: PathBuf,
}

impl RememberedUser {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The remembered username, if the file exists and is non-blank.
    pub fn load(&self) -> Option<String> {
        let text = fs::read_to_string(&self.path).ok()?;
        let name = text.trim();
        (!name.is_empty()).then(|| name.to_string())
    }

    /// Write `username` when `remember` is set, otherwise remove the file.
    pub fn store(&self, username: &str, remember: bool) -> Result<(), AppError> {
        if remember && !username.is_empty() {
            return fs::write(&self.path, username).map_err(|e| {
                AppError::file_access(format!("Failed to write '{}': {e}", self.path.display()))
            });
        }
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::file_access(format!(
                "Failed to remove '{}': {e}",
                self.path.display()
            ))),
        }
    }
}
