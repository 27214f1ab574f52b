//! Input/output helpers.
//!
//! - dataset CSV ingest + normalization (`ingest`)
//! - analysis summary export (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
