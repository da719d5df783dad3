//! marginal-core - Marginal distribution plot planning
//!
//! Given a variables x observations matrix, this crate summarizes every
//! variable with one statistic, picks 15 representative variables across
//! the range of that statistic, and builds a [`RenderPlan`] holding their
//! density curves and jittered observations.
//!
//! # Key Components
//!
//! - **Matrix / Labels**: input data and optional per-observation categories
//! - **MarginalPlotter**: validates input and builds the plan
//! - **RenderPlan**: one overview panel plus 15 variable panels, ready to draw
//! - **PlotConfig**: KDE grid, jitter, and layout settings (JSON or TOML)
//!
//! # Example
//!
//! ```ignore
//! let data = Matrix::new(expression)?.with_variable_names(gene_names)?;
//! let labels = Labels::new(&conditions);
//! let plan = build_plan(&data, &"median".into(), &"equally_spaced".into(), Some(&labels))?;
//! let json = export::to_json(&plan)?;
//! ```

pub mod axis;
pub mod config;
pub mod error;
pub mod export;
pub mod matrix;
pub mod orchestrator;
pub mod palette;
pub mod plan;

pub use axis::AxisRange;
pub use config::*;
pub use error::*;
pub use matrix::*;
pub use orchestrator::*;
pub use palette::*;
pub use plan::*;

pub use marginal_stats::{
    BuiltinSelection, BuiltinStatistic, DensityCurve, SelectionChoice, StatisticChoice,
    SELECTION_SIZE,
};
