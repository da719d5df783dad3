//! Representative variable selection.
//!
//! A selection is a list of exactly [`SELECTION_SIZE`] ranks into the
//! ascending sort order of the statistic vector. Ranks are turned into
//! variable indices with [`representative_indices`].

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{StatsError, StatsResult};

/// Number of variables shown in detail
pub const SELECTION_SIZE: usize = 15;

/// Built-in selection strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinSelection {
    /// Ranks `round(k * V / 16)` for `k = 1..=15`
    EquallySpaced,
    /// The 15 smallest statistics, ascending
    Min,
    /// The 15 largest statistics, descending
    Max,
}

impl BuiltinSelection {
    pub const ALL: [BuiltinSelection; 3] = [
        BuiltinSelection::EquallySpaced,
        BuiltinSelection::Min,
        BuiltinSelection::Max,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            BuiltinSelection::EquallySpaced => "equally_spaced",
            BuiltinSelection::Min => "min",
            BuiltinSelection::Max => "max",
        }
    }

    /// Ranks for a matrix with `n_vars` variables.
    ///
    /// `EquallySpaced` repeats ranks when `n_vars < 16` and, for
    /// `n_vars <= 8`, its last rank rounds up to `n_vars` itself; range
    /// checking happens in [`SelectionChoice::ranks`]. `Min` and `Max` need
    /// at least 15 variables.
    pub fn ranks(&self, n_vars: usize) -> StatsResult<Vec<usize>> {
        match self {
            BuiltinSelection::EquallySpaced => {
                let slots = (SELECTION_SIZE + 1) as f64;
                Ok((1..=SELECTION_SIZE)
                    .map(|k| ((k * n_vars) as f64 / slots).round_ties_even() as usize)
                    .collect())
            }
            BuiltinSelection::Min => {
                self.require(n_vars)?;
                Ok((0..SELECTION_SIZE).collect())
            }
            BuiltinSelection::Max => {
                self.require(n_vars)?;
                Ok((n_vars - SELECTION_SIZE..n_vars).rev().collect())
            }
        }
    }

    fn require(&self, n_vars: usize) -> StatsResult<()> {
        if n_vars < SELECTION_SIZE {
            return Err(StatsError::TooFewVariables {
                name: self.id().to_string(),
                needed: SELECTION_SIZE,
                available: n_vars,
            });
        }
        Ok(())
    }
}

/// Lookup table of built-in selection strategies by name
pub struct SelectionRegistry {
    by_name: HashMap<&'static str, BuiltinSelection>,
}

impl SelectionRegistry {
    pub fn new() -> Self {
        let by_name = BuiltinSelection::ALL
            .iter()
            .map(|&selection| (selection.id(), selection))
            .collect();
        Self { by_name }
    }

    /// The process-wide registry
    pub fn global() -> &'static SelectionRegistry {
        static REGISTRY: OnceLock<SelectionRegistry> = OnceLock::new();
        REGISTRY.get_or_init(SelectionRegistry::new)
    }

    pub fn get(&self, name: &str) -> Option<BuiltinSelection> {
        self.by_name.get(name).copied()
    }

    pub fn resolve(&self, name: &str) -> StatsResult<BuiltinSelection> {
        self.get(name)
            .ok_or_else(|| StatsError::UnknownSelection(name.to_string()))
    }

    pub fn names(&self) -> Vec<&'static str> {
        BuiltinSelection::ALL.iter().map(|s| s.id()).collect()
    }
}

impl Default for SelectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Which variables to show: a registry name or explicit ranks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionChoice {
    Named(String),
    Explicit(Vec<usize>),
}

impl SelectionChoice {
    pub fn named(name: impl Into<String>) -> Self {
        SelectionChoice::Named(name.into())
    }

    pub fn explicit(ranks: impl Into<Vec<usize>>) -> Self {
        SelectionChoice::Explicit(ranks.into())
    }

    /// Produce exactly [`SELECTION_SIZE`] ranks, each in `[0, n_vars)`.
    pub fn ranks(&self, n_vars: usize) -> StatsResult<Vec<usize>> {
        let ranks = match self {
            SelectionChoice::Named(name) => {
                SelectionRegistry::global().resolve(name)?.ranks(n_vars)?
            }
            SelectionChoice::Explicit(ranks) => {
                if ranks.len() != SELECTION_SIZE {
                    return Err(StatsError::SelectionLength {
                        expected: SELECTION_SIZE,
                        actual: ranks.len(),
                    });
                }
                ranks.clone()
            }
        };

        if let Some(&rank) = ranks.iter().find(|&&rank| rank >= n_vars) {
            return Err(StatsError::RankOutOfRange {
                rank,
                available: n_vars,
            });
        }

        if has_duplicates(&ranks) {
            tracing::warn!(
                variables = n_vars,
                "selection contains repeated ranks; some variables will be shown twice"
            );
        }

        Ok(ranks)
    }
}

impl From<&str> for SelectionChoice {
    fn from(name: &str) -> Self {
        SelectionChoice::named(name)
    }
}

impl From<BuiltinSelection> for SelectionChoice {
    fn from(selection: BuiltinSelection) -> Self {
        SelectionChoice::Named(selection.id().to_string())
    }
}

fn has_duplicates(ranks: &[usize]) -> bool {
    let mut sorted = ranks.to_vec();
    sorted.sort_unstable();
    sorted.windows(2).any(|w| w[0] == w[1])
}

/// Stable ascending argsort; NaN values sort last.
pub fn argsort(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    order
}

/// Map ranks into variable indices through the ascending sort order of `statistic`.
pub fn representative_indices(statistic: &[f64], ranks: &[usize]) -> StatsResult<Vec<usize>> {
    let order = argsort(statistic);
    ranks
        .iter()
        .map(|&rank| {
            order.get(rank).copied().ok_or(StatsError::RankOutOfRange {
                rank,
                available: order.len(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equally_spaced_distinct_for_large_v() {
        for n_vars in 16..300 {
            let ranks = BuiltinSelection::EquallySpaced.ranks(n_vars).unwrap();
            assert_eq!(ranks.len(), SELECTION_SIZE);
            assert!(ranks.windows(2).all(|w| w[0] < w[1]), "V = {}", n_vars);
            assert!(ranks.iter().all(|&r| r < n_vars));
        }
    }

    #[test]
    fn test_equally_spaced_known_values() {
        let ranks = BuiltinSelection::EquallySpaced.ranks(32).unwrap();
        assert_eq!(ranks, (1..=15).map(|k| 2 * k).collect::<Vec<_>>());

        // 40 / 16 = 2.5 rounds to even
        let ranks = BuiltinSelection::EquallySpaced.ranks(40).unwrap();
        assert_eq!(ranks[0], 2);
        assert_eq!(ranks[2], 8);
    }

    #[test]
    fn test_equally_spaced_small_v_repeats() {
        let ranks = SelectionChoice::named("equally_spaced").ranks(12).unwrap();
        assert_eq!(ranks.len(), SELECTION_SIZE);
        assert!(has_duplicates(&ranks));
        assert_eq!(ranks[14], 11);
    }

    #[test]
    fn test_equally_spaced_tiny_v_out_of_range() {
        // 15 * 8 / 16 = 7.5 rounds to 8
        let raw = BuiltinSelection::EquallySpaced.ranks(8).unwrap();
        assert_eq!(raw[14], 8);

        let err = SelectionChoice::named("equally_spaced").ranks(8).unwrap_err();
        assert_eq!(
            err,
            StatsError::RankOutOfRange {
                rank: 8,
                available: 8
            }
        );
    }

    #[test]
    fn test_min_and_max_ranks() {
        assert_eq!(
            BuiltinSelection::Min.ranks(20).unwrap(),
            (0..15).collect::<Vec<_>>()
        );
        assert_eq!(
            BuiltinSelection::Max.ranks(20).unwrap(),
            (5..20).rev().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_min_max_need_fifteen_variables() {
        let err = BuiltinSelection::Max.ranks(10).unwrap_err();
        assert!(matches!(err, StatsError::TooFewVariables { available: 10, .. }));
        assert!(BuiltinSelection::Min.ranks(14).is_err());
        assert!(BuiltinSelection::Min.ranks(15).is_ok());
    }

    #[test]
    fn test_unknown_selection() {
        let err = SelectionChoice::named("middle").ranks(20).unwrap_err();
        assert_eq!(err, StatsError::UnknownSelection("middle".to_string()));
    }

    #[test]
    fn test_explicit_selection_length() {
        let err = SelectionChoice::explicit(vec![0, 1, 2]).ranks(20).unwrap_err();
        assert_eq!(
            err,
            StatsError::SelectionLength {
                expected: 15,
                actual: 3
            }
        );
    }

    #[test]
    fn test_explicit_selection_out_of_range() {
        let mut ranks: Vec<usize> = (0..15).collect();
        ranks[14] = 20;
        let err = SelectionChoice::explicit(ranks).ranks(20).unwrap_err();
        assert_eq!(
            err,
            StatsError::RankOutOfRange {
                rank: 20,
                available: 20
            }
        );
    }

    #[test]
    fn test_argsort_is_stable() {
        let values = vec![2.0, 1.0, 2.0, 1.0, f64::NAN, 0.0];
        assert_eq!(argsort(&values), vec![5, 1, 3, 0, 2, 4]);
    }

    #[test]
    fn test_representative_indices_round_trip() {
        let statistic: Vec<f64> = (0..20).map(|x| x as f64).collect();

        let min = BuiltinSelection::Min.ranks(20).unwrap();
        assert_eq!(
            representative_indices(&statistic, &min).unwrap(),
            (0..15).collect::<Vec<_>>()
        );

        let max = BuiltinSelection::Max.ranks(20).unwrap();
        assert_eq!(
            representative_indices(&statistic, &max).unwrap(),
            (5..20).rev().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_representative_indices_follow_sort_order() {
        // Reverse-ordered statistic: smallest value lives at the last index
        let statistic: Vec<f64> = (0..20).rev().map(|x| x as f64).collect();
        let min = BuiltinSelection::Min.ranks(20).unwrap();
        let indices = representative_indices(&statistic, &min).unwrap();
        assert_eq!(indices[0], 19);
        assert_eq!(indices[14], 5);
    }
}
