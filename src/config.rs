//! Runtime configuration.
//!
//! Each setting resolves as: CLI flag > environment variable (including a
//! `.env` file) > built-in default.

use std::path::PathBuf;

use crate::cli::GlobalArgs;

pub const DEFAULT_DATA_FILE: &str = "WHO-COVID-19-global-daily-data.csv";
pub const DEFAULT_USERS_FILE: &str = "users.txt";
pub const DEFAULT_REMEMBER_FILE: &str = "remember_me.txt";
pub const DEFAULT_LOG_FILE: &str = "covid.log";

const ENV_DATA_FILE: &str = "COVID_DATA_FILE";
const ENV_USERS_FILE: &str = "COVID_USERS_FILE";
const ENV_REMEMBER_FILE: &str = "COVID_REMEMBER_FILE";
const ENV_LOG_FILE: &str = "COVID_LOG_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub users_file: PathBuf,
    pub remember_file: PathBuf,
    pub log_file: PathBuf,
}

impl AppConfig {
    /// Resolve from CLI flags and the process environment.
    pub fn from_args(args: &GlobalArgs) -> Self {
        dotenvy::dotenv().ok();
        Self::resolve(args, |key| std::env::var(key).ok())
    }

    /// Resolve with an explicit environment lookup (used by tests).
    pub fn resolve(args: &GlobalArgs, env: impl Fn(&str) -> Option<String>) -> Self {
        let pick = |flag: &Option<PathBuf>, key: &str, default: &str| -> PathBuf {
            flag.clone()
                .or_else(|| env(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(default))
        };

        Self {
            data_file: pick(&args.data, ENV_DATA_FILE, DEFAULT_DATA_FILE),
            users_file: pick(&args.users, ENV_USERS_FILE, DEFAULT_USERS_FILE),
            remember_file: pick(&args.remember, ENV_REMEMBER_FILE, DEFAULT_REMEMBER_FILE),
            log_file: pick(&args.log_file, ENV_LOG_FILE, DEFAULT_LOG_FILE),
        }
    }
}
