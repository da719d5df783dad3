//! Error types for marginal-stats

use thiserror::Error;

/// Error type for statistic, selection and density operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("unsupported statistic name: {0}")]
    UnknownStatistic(String),

    #[error("unsupported selection name: {0}")]
    UnknownSelection(String),

    #[error("statistic '{name}' produced {actual} values for {expected} variables")]
    StatisticLength {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("selection must contain exactly {expected} ranks, got {actual}")]
    SelectionLength { expected: usize, actual: usize },

    #[error("selection '{name}' needs at least {needed} variables, got {available}")]
    TooFewVariables {
        name: String,
        needed: usize,
        available: usize,
    },

    #[error("rank {rank} is out of range for {available} variables")]
    RankOutOfRange { rank: usize, available: usize },

    #[error("observations have zero spread (every value is {value})")]
    ZeroSpread { value: f64 },

    #[error("no observations to estimate a density from")]
    NoObservations,

    #[error("observation {index} is not finite ({value})")]
    NonFiniteObservation { index: usize, value: f64 },

    #[error("expected {expected} group codes, got {actual}")]
    GroupLength { expected: usize, actual: usize },
}

impl StatsError {
    /// Whether the error comes from the data itself rather than the caller's choices
    pub fn is_degenerate(&self) -> bool {
        matches!(
            self,
            StatsError::ZeroSpread { .. }
                | StatsError::NoObservations
                | StatsError::NonFiniteObservation { .. }
        )
    }
}

/// Result type alias for marginal-stats operations
pub type StatsResult<T> = Result<T, StatsError>;
