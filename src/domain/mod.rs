//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - loaded observations (`Record`, `Dataset`)
//! - query inputs and results (`DateWindow`, `FilteredView`)
//! - derived metrics (`DerivedRow`, `AugmentedView`)
//! - chart selection (`ChartKind`)

pub mod types;

pub use types::*;
