//! `covid-charts` library crate.
//!
//! The binary (`covid`) is a thin wrapper around this library so that:
//!
//! - the load/filter/metrics pipeline is testable without a terminal
//! - the TUI and the one-shot CLI share the same chart shaping
//! - code stays easy to navigate as the project grows

pub mod analysis;
pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod tui;
