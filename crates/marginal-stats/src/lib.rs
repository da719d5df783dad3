//! marginal-stats - Statistical primitives for marginal distribution plots
//!
//! This crate provides the numeric side of a marginal distribution plot:
//!
//! - **Statistics**: per-variable reducers looked up by name or supplied by the caller
//! - **Selection**: 15 representative ranks into the sorted statistic
//! - **KDE**: Gaussian density curves with a range-based bandwidth and
//!   label-grouped curves scaled by group proportion
//! - **Jitter**: seeded vertical positions for the raw-observation scatter
//!
//! Nothing here draws; curves and points are handed to a renderer.

pub mod error;
pub mod jitter;
pub mod kde;
pub mod selection;
pub mod statistic;
pub mod summary;

pub use error::*;
pub use jitter::*;
pub use kde::*;
pub use selection::*;
pub use statistic::*;
pub use summary::Moments;
