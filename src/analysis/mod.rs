//! Query-side computations over a loaded dataset.
//!
//! - narrowing to one entity and date window (`filter`)
//! - growth and moving-average metrics over the narrowed series (`metrics`)

pub mod filter;
pub mod metrics;

pub use filter::*;
pub use metrics::*;
