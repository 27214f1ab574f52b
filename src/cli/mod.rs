//! Command-line parsing for the COVID chart viewer.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! data pipeline and the terminal UI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::ChartKind;

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "covid", version, about = "COVID-19 case/death chart viewer")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// File locations and logging, shared by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Dataset CSV (default: $COVID_DATA_FILE or WHO-COVID-19-global-daily-data.csv).
    #[arg(long, global = true, value_name = "CSV")]
    pub data: Option<PathBuf>,

    /// Choose the dataset interactively from CSV files under the current directory.
    #[arg(long, global = true, conflicts_with = "data")]
    pub pick: bool,

    /// Credential file (default: $COVID_USERS_FILE or users.txt).
    #[arg(long, global = true, value_name = "FILE")]
    pub users: Option<PathBuf>,

    /// Remembered-username file (default: $COVID_REMEMBER_FILE or remember_me.txt).
    #[arg(long, global = true, value_name = "FILE")]
    pub remember: Option<PathBuf>,

    /// Log file used while the TUI is running (default: $COVID_LOG_FILE or covid.log).
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive TUI (login screen, then charts).
    Tui,
    /// List the countries present in the dataset.
    Entities,
    /// Render a chart for one country as terminal text.
    Chart(ChartArgs),
    /// Print the analysis summary, optionally writing it to a file.
    Summary(SummaryArgs),
    /// Create an account in the credential file.
    Signup(SignupArgs),
}

/// Country and optional inclusive date bounds.
#[derive(Debug, Clone, Args)]
pub struct SelectionArgs {
    /// Country name exactly as it appears in the dataset.
    #[arg(short, long)]
    pub entity: String,

    /// First date to include (YYYY-MM-DD).
    #[arg(long, default_value = "")]
    pub from: String,

    /// Last date to include (YYYY-MM-DD).
    #[arg(long, default_value = "")]
    pub to: String,
}

#[derive(Debug, Clone, Args)]
pub struct ChartArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Which chart to draw.
    #[arg(short, long, value_enum, default_value_t = ChartKind::Trend)]
    pub kind: ChartKind,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

#[derive(Debug, Clone, Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Write the summary to this text file.
    #[arg(short, long, value_name = "TXT")]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct SignupArgs {
    #[arg(short, long)]
    pub username: String,

    #[arg(short, long)]
    pub password: String,
}
