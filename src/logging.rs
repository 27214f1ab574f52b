//! Tracing subscriber setup.
//!
//! Priority for the filter: `RUST_LOG` > `--verbose` > `info`.
//! The TUI owns the terminal, so it logs to a file instead of stderr.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::AppError;

fn env_filter(verbose: bool) -> EnvFilter {
    if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    }
}

/// Log compact lines to stderr (CLI subcommands).
pub fn init_stderr(verbose: bool) {
    let installed = tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .try_init();
    report_reinit(installed);
}

/// Append log lines to `path` (TUI).
pub fn init_file(path: &Path, verbose: bool) -> Result<(), AppError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| AppError::file_access(format!("Failed to open log file '{}': {e}", path.display())))?;

    let installed = tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init();
    report_reinit(installed);
    Ok(())
}

/// A second install leaves the first subscriber in place; say so through it.
fn report_reinit(installed: Result<(), TryInitError>) -> bool {
    match installed {
        Ok(()) => true,
        Err(err) => {
            tracing::debug!(error = %err, "tracing subscriber already installed");
            false
        }
    }
}
