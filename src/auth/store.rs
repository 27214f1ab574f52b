//! Credential storage.
//!
//! Callers only see the `CredentialStore` trait. The one implementation today
//! is a flat `username:password` file with plaintext passwords; a hashed store
//! can replace it without touching the account rules in `auth`.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Field separator in the credential file. Disallowed inside either field.
pub const SEPARATOR: char = ':';

pub trait CredentialStore {
    /// All stored entries, keyed by username.
    fn load(&self) -> Result<HashMap<String, String>, AppError>;

    /// Persist one entry. Does not check for duplicates.
    fn save(&self, username: &str, password: &str) -> Result<(), AppError>;

    /// Whether `password` matches what is stored for `username`.
    fn verify(&self, username: &str, password: &str) -> Result<bool, AppError> {
        Ok(self.load()?.get(username).is_some_and(|stored| stored == password))
    }
}

/// Line-oriented `username:password` file, opened per operation.
#[derive(Debug, Clone)]
pub struct FlatFileStore {
    path: PathBuf,
}

impl FlatFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FlatFileStore {
    fn load(&self) -> Result<HashMap<String, String>, AppError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => {
                return Err(AppError::file_access(format!(
                    "Failed to read users file '{}': {e}",
                    self.path.display()
                )));
            }
        };

        let mut users = HashMap::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| AppError::file_access(format!("Failed to read users file: {e}")))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line.split_once(SEPARATOR) {
                Some((username, password)) => {
                    users.insert(username.to_string(), password.to_string());
                }
                None => tracing::debug!("skipping malformed credential line"),
            }
        }
        Ok(users)
    }

    fn save(&self, username: &str, password: &str) -> Result<(), AppError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                AppError::file_access(format!("Failed to open users file '{}': {e}", self.path.display()))
            })?;
        writeln!(file, "{username}{SEPARATOR}{password}")
            .map_err(|e| AppError::file_access(format!("Failed to write users file: {e}")))?;
        Ok(())
    }
}
