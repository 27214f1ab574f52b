//! Account rules for the login screen.
//!
//! Storage lives behind `CredentialStore`; this module only validates input
//! and decides outcomes. Passwords are compared verbatim and never logged.

use crate::error::AppError;

pub mod remember;
pub mod store;

pub use remember::RememberedUser;
pub use store::{CredentialStore, FlatFileStore, SEPARATOR};

/// Check credentials. Both fields are trimmed first.
///
/// Returns the trimmed username on success.
pub fn log_in(store: &dyn CredentialStore, username: &str, password: &str) -> Result<String, AppError> {
    let username = username.trim();
    let password = password.trim();

    if username.is_empty() || password.is_empty() {
        return Err(AppError::validation("Please enter both username and password."));
    }

    // Re-read on every attempt so accounts created since startup are visible.
    if store.verify(username, password)? {
        tracing::info!(username, "login succeeded");
        Ok(username.to_string())
    } else {
        tracing::info!(username, "login rejected");
        Err(AppError::validation("Invalid username or password."))
    }
}

/// Create an account. Both fields are trimmed first.
pub fn sign_up(store: &dyn CredentialStore, username: &str, password: &str) -> Result<String, AppError> {
    let username = username.trim();
    let password = password.trim();

    if username.is_empty() || password.is_empty() {
        return Err(AppError::validation("Username and password cannot be empty."));
    }
    if username.contains(SEPARATOR) || password.contains(SEPARATOR) {
        return Err(AppError::validation(format!("'{SEPARATOR}' character is not allowed.")));
    }

    // The file may have been edited externally since the last read.
    if store.load()?.contains_key(username) {
        return Err(AppError::validation("Username already exists. Try another."));
    }

    store.save(username, password)?;
    tracing::info!(username, "account created");
    Ok(username.to_string())
}
