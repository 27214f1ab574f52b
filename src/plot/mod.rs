//! Plain-text chart rendering for the non-interactive CLI.

pub mod ascii;

pub use ascii::*;
