//! Summary statistics applied per variable.
//!
//! A statistic reduces a variables x observations matrix to one scalar per
//! variable (row). Built-in reducers are looked up by name through the
//! [`StatisticRegistry`]; callers can also supply their own reducer through
//! [`StatisticChoice::custom`].

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use ndarray::{ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{StatsError, StatsResult};
use crate::summary::{self, Moments};

/// A reducer from a variables x observations matrix to one value per variable.
pub trait Statistic: Send + Sync {
    /// Display name used in titles (e.g. "mean")
    fn name(&self) -> &str;

    /// Reduce every row of `data` to a scalar
    fn apply(&self, data: ArrayView2<'_, f64>) -> Vec<f64>;
}

/// Built-in per-variable reducers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinStatistic {
    Mean,
    Median,
    Std,
    Skewness,
    Kurtosis,
    UniqueObs,
    ZeroObs,
}

impl BuiltinStatistic {
    pub const ALL: [BuiltinStatistic; 7] = [
        BuiltinStatistic::Mean,
        BuiltinStatistic::Median,
        BuiltinStatistic::Std,
        BuiltinStatistic::Skewness,
        BuiltinStatistic::Kurtosis,
        BuiltinStatistic::UniqueObs,
        BuiltinStatistic::ZeroObs,
    ];

    /// Registry name of this statistic
    pub fn id(&self) -> &'static str {
        match self {
            BuiltinStatistic::Mean => "mean",
            BuiltinStatistic::Median => "median",
            BuiltinStatistic::Std => "std",
            BuiltinStatistic::Skewness => "skewness",
            BuiltinStatistic::Kurtosis => "kurtosis",
            BuiltinStatistic::UniqueObs => "unique_obs",
            BuiltinStatistic::ZeroObs => "zero_obs",
        }
    }

    /// Reduce one variable's observations
    pub fn reduce(&self, row: ArrayView1<'_, f64>) -> f64 {
        match self {
            BuiltinStatistic::Mean => Moments::from_data(row.iter()).mean,
            BuiltinStatistic::Std => Moments::from_data(row.iter()).std_dev(),
            BuiltinStatistic::Skewness => Moments::from_data(row.iter()).skewness(),
            BuiltinStatistic::Kurtosis => Moments::from_data(row.iter()).kurtosis(),
            BuiltinStatistic::Median => summary::median(&row.to_vec()),
            BuiltinStatistic::UniqueObs => summary::unique_count(&row.to_vec()) as f64,
            BuiltinStatistic::ZeroObs => summary::zero_count(&row.to_vec()) as f64,
        }
    }
}

impl Statistic for BuiltinStatistic {
    fn name(&self) -> &str {
        self.id()
    }

    fn apply(&self, data: ArrayView2<'_, f64>) -> Vec<f64> {
        data.axis_iter(Axis(0)).map(|row| self.reduce(row)).collect()
    }
}

/// Lookup table of built-in statistics by name.
///
/// The table is immutable once built; [`StatisticRegistry::global`] shares a
/// single instance for the whole process.
pub struct StatisticRegistry {
    statistics: Vec<BuiltinStatistic>,
    by_name: HashMap<&'static str, usize>,
}

impl StatisticRegistry {
    /// Create a registry with all built-in statistics registered.
    pub fn new() -> Self {
        let mut registry = Self {
            statistics: Vec::new(),
            by_name: HashMap::new(),
        };
        for statistic in BuiltinStatistic::ALL {
            registry.register(statistic);
        }
        registry
    }

    /// The process-wide registry
    pub fn global() -> &'static StatisticRegistry {
        static REGISTRY: OnceLock<StatisticRegistry> = OnceLock::new();
        REGISTRY.get_or_init(StatisticRegistry::new)
    }

    fn register(&mut self, statistic: BuiltinStatistic) {
        let index = self.statistics.len();
        self.by_name.insert(statistic.id(), index);
        self.statistics.push(statistic);
    }

    /// Get a statistic by name.
    pub fn get(&self, name: &str) -> Option<BuiltinStatistic> {
        self.by_name.get(name).map(|&index| self.statistics[index])
    }

    /// Get a statistic by name, failing on unknown names.
    pub fn resolve(&self, name: &str) -> StatsResult<BuiltinStatistic> {
        self.get(name)
            .ok_or_else(|| StatsError::UnknownStatistic(name.to_string()))
    }

    /// Registered names in registration order
    pub fn names(&self) -> Vec<&'static str> {
        self.statistics.iter().map(|s| s.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.statistics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statistics.is_empty()
    }
}

impl Default for StatisticRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A caller-supplied reducer wrapped with a display name
pub struct CustomStatistic<F> {
    name: String,
    reducer: F,
}

impl<F> CustomStatistic<F>
where
    F: Fn(ArrayView2<'_, f64>) -> Vec<f64> + Send + Sync,
{
    pub fn new(name: impl Into<String>, reducer: F) -> Self {
        Self {
            name: name.into(),
            reducer,
        }
    }
}

impl<F> Statistic for CustomStatistic<F>
where
    F: Fn(ArrayView2<'_, f64>) -> Vec<f64> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, data: ArrayView2<'_, f64>) -> Vec<f64> {
        (self.reducer)(data)
    }
}

/// Which statistic to compute: a registry name or a custom reducer.
#[derive(Clone)]
pub enum StatisticChoice {
    Named(String),
    Custom(Arc<dyn Statistic>),
}

impl StatisticChoice {
    pub fn named(name: impl Into<String>) -> Self {
        StatisticChoice::Named(name.into())
    }

    /// Wrap a closure as a custom statistic named "custom"
    pub fn custom<F>(reducer: F) -> Self
    where
        F: Fn(ArrayView2<'_, f64>) -> Vec<f64> + Send + Sync + 'static,
    {
        Self::custom_named("custom", reducer)
    }

    pub fn custom_named<F>(name: impl Into<String>, reducer: F) -> Self
    where
        F: Fn(ArrayView2<'_, f64>) -> Vec<f64> + Send + Sync + 'static,
    {
        StatisticChoice::Custom(Arc::new(CustomStatistic::new(name, reducer)))
    }

    /// Resolve to a concrete statistic; named choices go through the global registry.
    pub fn resolve(&self) -> StatsResult<Arc<dyn Statistic>> {
        match self {
            StatisticChoice::Named(name) => {
                let builtin = StatisticRegistry::global().resolve(name)?;
                Ok(Arc::new(builtin))
            }
            StatisticChoice::Custom(statistic) => Ok(Arc::clone(statistic)),
        }
    }

    /// Compute the statistic vector and check it has one value per variable.
    pub fn compute(&self, data: ArrayView2<'_, f64>) -> StatsResult<ComputedStatistic> {
        let statistic = self.resolve()?;
        let values = statistic.apply(data);
        let expected = data.nrows();
        if values.len() != expected {
            return Err(StatsError::StatisticLength {
                name: statistic.name().to_string(),
                expected,
                actual: values.len(),
            });
        }

        tracing::debug!(
            statistic = statistic.name(),
            variables = expected,
            "computed summary statistic"
        );

        Ok(ComputedStatistic {
            name: statistic.name().to_string(),
            values,
        })
    }
}

impl fmt::Debug for StatisticChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatisticChoice::Named(name) => f.debug_tuple("Named").field(name).finish(),
            StatisticChoice::Custom(statistic) => {
                f.debug_tuple("Custom").field(&statistic.name()).finish()
            }
        }
    }
}

impl From<&str> for StatisticChoice {
    fn from(name: &str) -> Self {
        StatisticChoice::named(name)
    }
}

impl From<BuiltinStatistic> for StatisticChoice {
    fn from(statistic: BuiltinStatistic) -> Self {
        StatisticChoice::Named(statistic.id().to_string())
    }
}

/// One value per variable, tagged with the statistic that produced it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComputedStatistic {
    pub name: String,
    pub values: Vec<f64>,
}

impl ComputedStatistic {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values in ascending order
    pub fn sorted(&self) -> Vec<f64> {
        let mut sorted = self.values.clone();
        sorted.sort_by(f64::total_cmp);
        sorted
    }
}
