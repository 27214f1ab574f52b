//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and resolves file locations
//! - installs logging
//! - loads the dataset
//! - hands off to the TUI or runs a one-shot subcommand

use std::path::PathBuf;

use clap::Parser;

use crate::analysis::Selection;
use crate::cli::{ChartArgs, Command, GlobalArgs, SelectionArgs, SignupArgs, SummaryArgs};
use crate::config::AppConfig;
use crate::domain::Dataset;
use crate::error::AppError;

pub mod pipeline;
pub mod session;

const SUBCOMMANDS: [&str; 5] = ["tui", "entities", "chart", "summary", "signup"];

/// Entry point for the `covid` binary.
pub fn run() -> Result<(), AppError> {
    // `covid` and `covid --data x.csv` behave like `covid tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let mut config = AppConfig::from_args(&cli.global);
    if cli.global.pick {
        config.data_file = crate::cli::picker::prompt_for_csv_path()?;
    }

    match cli.command {
        Command::Tui => handle_tui(&config, &cli.global),
        Command::Entities => {
            crate::logging::init_stderr(cli.global.verbose);
            handle_entities(&config)
        }
        Command::Chart(args) => {
            crate::logging::init_stderr(cli.global.verbose);
            handle_chart(&config, args)
        }
        Command::Summary(args) => {
            crate::logging::init_stderr(cli.global.verbose);
            handle_summary(&config, args)
        }
        Command::Signup(args) => {
            crate::logging::init_stderr(cli.global.verbose);
            handle_signup(&config, args)
        }
    }
}

fn handle_tui(config: &AppConfig, global: &GlobalArgs) -> Result<(), AppError> {
    crate::logging::init_file(&config.log_file, global.verbose)?;
    tracing::info!(data = %config.data_file.display(), "starting tui");
    let outcome = crate::io::load_dataset(&config.data_file);
    crate::tui::run(config, outcome)
}

fn load(config: &AppConfig) -> Result<Dataset, AppError> {
    let (dataset, report) = crate::io::read_dataset(&config.data_file)?;
    eprintln!(
        "{}",
        crate::report::format_load_report(&report, dataset.entities().len())
    );
    Ok(dataset)
}

fn handle_entities(config: &AppConfig) -> Result<(), AppError> {
    let dataset = load(config)?;
    for entity in dataset.entities() {
        println!("{entity}");
    }
    Ok(())
}

fn handle_chart(config: &AppConfig, args: ChartArgs) -> Result<(), AppError> {
    let dataset = load(config)?;
    let view = pipeline::select_view(&dataset, &selection_from_args(&args.selection))?;

    let text = match pipeline::shape_chart(&view, args.kind)? {
        pipeline::ChartData::Trend(c) => crate::plot::render_trend(&c, args.width, args.height),
        pipeline::ChartData::Bar(c) => crate::plot::render_bars(&c, args.width, args.height),
        pipeline::ChartData::Composition(c) => crate::plot::render_composition(&c, args.width),
    };
    println!("{text}");
    Ok(())
}

fn handle_summary(config: &AppConfig, args: SummaryArgs) -> Result<(), AppError> {
    let dataset = load(config)?;
    let view = pipeline::select_view(&dataset, &selection_from_args(&args.selection))?;
    let summary = crate::report::summarize(&view)?;

    print!("{}", crate::report::format_summary(&summary));
    if let Some(path) = &args.out {
        crate::io::export::write_summary(path, &summary)?;
        println!("Analysis saved to: {}", path.display());
    }
    Ok(())
}

fn handle_signup(config: &AppConfig, args: SignupArgs) -> Result<(), AppError> {
    let store = crate::auth::FlatFileStore::new(PathBuf::from(&config.users_file));
    let username = crate::auth::sign_up(&store, &args.username, &args.password)?;
    println!("Account '{username}' created successfully. You can now log in.");
    Ok(())
}

fn selection_from_args(args: &SelectionArgs) -> Selection {
    Selection::new(args.entity.as_str(), args.from.as_str(), args.to.as_str())
}

/// Rewrite argv so `covid` defaults to `covid tui`.
///
/// Rules:
/// - `covid`                        -> `covid tui`
/// - `covid --data x.csv ...`       -> `covid tui --data x.csv ...`
/// - `covid --help/--version/-h`    -> unchanged (show top-level help/version)
/// - any argv naming a subcommand   -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    if argv.len() <= 1 {
        argv.push("tui".to_string());
        return argv;
    }

    let rest = &argv[1..];
    let is_help_or_version = rest
        .iter()
        .any(|a| matches!(a.as_str(), "-h" | "--help" | "-V" | "--version" | "help"));
    let has_subcommand = rest.iter().any(|a| SUBCOMMANDS.contains(&a.as_str()));
    if is_help_or_version || has_subcommand {
        return argv;
    }

    argv.insert(1, "tui".to_string());
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_tui() {
        assert_eq!(rewrite_args(argv(&["covid"])), argv(&["covid", "tui"]));
    }

    #[test]
    fn global_flags_alone_open_tui() {
        assert_eq!(
            rewrite_args(argv(&["covid", "--data", "x.csv", "-v"])),
            argv(&["covid", "tui", "--data", "x.csv", "-v"])
        );
    }

    #[test]
    fn explicit_subcommands_and_help_are_untouched() {
        let a = argv(&["covid", "--data", "x.csv", "chart", "-e", "Chile"]);
        assert_eq!(rewrite_args(a.clone()), a);
        let h = argv(&["covid", "--help"]);
        assert_eq!(rewrite_args(h.clone()), h);
    }

    #[test]
    fn rewritten_args_parse() {
        let cli = crate::cli::Cli::parse_from(rewrite_args(argv(&["covid", "--users", "u.txt"])));
        assert!(matches!(cli.command, Command::Tui));
        assert_eq!(cli.global.users, Some(PathBuf::from("u.txt")));

        let cli = crate::cli::Cli::parse_from(argv(&[
            "covid", "chart", "-e", "Chile", "--from", "2020-03-01", "-k", "bar",
        ]));
        let Command::Chart(args) = cli.command else {
            panic!("expected chart");
        };
        assert_eq!(args.selection.entity, "Chile");
        assert_eq!(args.selection.from, "2020-03-01");
        assert_eq!(args.kind, crate::domain::ChartKind::Bar);
        assert_eq!(args.width, 100);
    }
}
