//! Error types for marginal-core
//!
//! Every failure aborts plan construction; no partial plan is returned.
//! - Shape: input is not a non-empty 2D matrix
//! - Configuration: unknown names, wrong lengths, bad config values
//! - Degenerate input: a selected variable has zero spread

use marginal_stats::StatsError;
use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for plan construction
#[derive(Error, Debug)]
pub enum PlotError {
    /// Input is not a usable 2D matrix
    #[error("Shape error: {0}")]
    Shape(String),

    /// Unknown statistic/selection, wrong output lengths, mismatched labels
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid plot configuration values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Density estimation impossible for a selected variable
    #[error("Degenerate input for variable '{variable}': {reason}")]
    DegenerateInput { variable: String, reason: String },

    /// Plan serialization failed
    #[error("Export failed: {0}")]
    Export(#[from] serde_json::Error),
}

impl PlotError {
    /// Attach the variable name to a density-estimation failure
    pub fn for_variable(variable: &str, err: StatsError) -> Self {
        if err.is_degenerate() {
            PlotError::DegenerateInput {
                variable: variable.to_string(),
                reason: err.to_string(),
            }
        } else {
            PlotError::Configuration(format!("variable '{}': {}", variable, err))
        }
    }
}

impl From<StatsError> for PlotError {
    fn from(err: StatsError) -> Self {
        if err.is_degenerate() {
            PlotError::DegenerateInput {
                variable: String::new(),
                reason: err.to_string(),
            }
        } else {
            PlotError::Configuration(err.to_string())
        }
    }
}

/// Result type alias for plan construction
pub type PlotResult<T> = Result<T, PlotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_error_display() {
        let err = PlotError::Shape("expected 2 dimensions, got 3".to_string());
        assert!(err.to_string().contains("3"));
    }

    #[test]
    fn test_stats_error_conversion() {
        let err: PlotError = StatsError::UnknownStatistic("mode".to_string()).into();
        assert!(matches!(err, PlotError::Configuration(_)));
        assert!(err.to_string().contains("mode"));
    }

    #[test]
    fn test_for_variable_degenerate() {
        let err = PlotError::for_variable("gene_7", StatsError::ZeroSpread { value: 2.0 });
        match err {
            PlotError::DegenerateInput { variable, .. } => assert_eq!(variable, "gene_7"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
