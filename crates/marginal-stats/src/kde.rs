//! Kernel density estimation for one variable.
//!
//! [`DensityEstimator`] owns the bandwidth rule and label grouping; the
//! actual estimator is any [`KernelDensity`] implementation, with
//! [`GaussianKde`] as the default.
//!
//! # Grouped curves
//!
//! Every group is estimated with the bandwidth of the full variable, and its
//! density is multiplied by `group_size / N`. Group curves therefore carry
//! their share of the total mass instead of each integrating to one.

use serde::{Deserialize, Serialize};

use crate::error::{StatsError, StatsResult};
use crate::summary;

/// Divisor of the observation range in the bandwidth rule
pub const BANDWIDTH_DIVISOR: f64 = 20.0;

const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// A sampled density curve: `density[i]` is the estimate at `support[i]`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DensityCurve {
    pub support: Vec<f64>,
    pub density: Vec<f64>,
}

impl DensityCurve {
    pub fn new(support: Vec<f64>, density: Vec<f64>) -> Self {
        debug_assert_eq!(support.len(), density.len());
        Self { support, density }
    }

    pub fn len(&self) -> usize {
        self.support.len()
    }

    pub fn is_empty(&self) -> bool {
        self.support.is_empty()
    }

    /// Multiply every density value by `factor`
    pub fn scaled(mut self, factor: f64) -> Self {
        for d in &mut self.density {
            *d *= factor;
        }
        self
    }

    /// Largest density value (0 for an empty curve)
    pub fn max_density(&self) -> f64 {
        self.density.iter().copied().fold(0.0, f64::max)
    }

    /// Trapezoidal integral over the support
    pub fn integrate(&self) -> f64 {
        self.support
            .windows(2)
            .zip(self.density.windows(2))
            .map(|(x, y)| (x[1] - x[0]) * (y[0] + y[1]) / 2.0)
            .sum()
    }

}

/// A univariate density estimator with an externally chosen bandwidth.
pub trait KernelDensity: Send + Sync {
    /// Estimate the density of `observations`; `bandwidth` must be positive.
    fn estimate(&self, observations: &[f64], bandwidth: f64) -> StatsResult<DensityCurve>;
}

/// Gaussian-kernel density estimate evaluated on an even grid
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GaussianKde {
    /// Number of grid points
    pub grid_size: usize,
    /// Grid extends `cut * bandwidth` beyond the data on each side
    pub cut: f64,
}

impl GaussianKde {
    pub fn new(grid_size: usize, cut: f64) -> Self {
        Self { grid_size, cut }
    }

    /// Density at a single point
    pub fn density_at(observations: &[f64], bandwidth: f64, x: f64) -> f64 {
        let n = observations.len() as f64;
        let sum: f64 = observations
            .iter()
            .map(|&xi| {
                let u = (x - xi) / bandwidth;
                (-0.5 * u * u).exp()
            })
            .sum();
        sum * INV_SQRT_2PI / (n * bandwidth)
    }

    fn grid(&self, lo: f64, hi: f64) -> Vec<f64> {
        if self.grid_size < 2 {
            return vec![(lo + hi) / 2.0];
        }
        let step = (hi - lo) / (self.grid_size - 1) as f64;
        (0..self.grid_size).map(|i| lo + step * i as f64).collect()
    }
}

impl Default for GaussianKde {
    fn default() -> Self {
        Self::new(200, 3.0)
    }
}

impl KernelDensity for GaussianKde {
    fn estimate(&self, observations: &[f64], bandwidth: f64) -> StatsResult<DensityCurve> {
        let (min, max) = summary::min_max(observations).ok_or(StatsError::NoObservations)?;
        if !(bandwidth > 0.0) {
            return Err(StatsError::ZeroSpread { value: min });
        }

        let support = self.grid(min - self.cut * bandwidth, max + self.cut * bandwidth);
        let density = support
            .iter()
            .map(|&x| Self::density_at(observations, bandwidth, x))
            .collect();
        Ok(DensityCurve::new(support, density))
    }
}

/// `(max - min) / 20`; fails when every observation is equal or any is NaN/infinite.
pub fn bandwidth(observations: &[f64]) -> StatsResult<f64> {
    let non_finite = observations
        .iter()
        .enumerate()
        .find(|(_, x)| !x.is_finite());
    if let Some((index, &value)) = non_finite {
        return Err(StatsError::NonFiniteObservation { index, value });
    }
    let (min, max) = summary::min_max(observations).ok_or(StatsError::NoObservations)?;
    let bw = (max - min) / BANDWIDTH_DIVISOR;
    if !(bw > 0.0) {
        return Err(StatsError::ZeroSpread { value: min });
    }
    Ok(bw)
}

/// Observation-to-group assignment: `codes[i]` is the group of observation `i`
#[derive(Clone, Copy, Debug)]
pub struct Grouping<'a> {
    pub codes: &'a [usize],
    pub n_groups: usize,
}

impl<'a> Grouping<'a> {
    pub fn new(codes: &'a [usize], n_groups: usize) -> Self {
        Self { codes, n_groups }
    }
}

/// Density of one label group, already scaled by its proportion
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupDensity {
    pub group: usize,
    pub size: usize,
    /// `size / N`
    pub proportion: f64,
    pub curve: DensityCurve,
}

/// Everything estimated for one variable
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariableDensity {
    pub bandwidth: f64,
    pub overall: DensityCurve,
    pub groups: Vec<GroupDensity>,
}

impl VariableDensity {
    /// Largest density over the unconditional and group curves
    pub fn max_density(&self) -> f64 {
        self.groups
            .iter()
            .map(|g| g.curve.max_density())
            .fold(self.overall.max_density(), f64::max)
    }
}

/// Bandwidth rule plus grouping on top of a [`KernelDensity`]
#[derive(Clone, Debug, Default)]
pub struct DensityEstimator<K = GaussianKde> {
    kernel: K,
}

impl<K: KernelDensity> DensityEstimator<K> {
    pub fn new(kernel: K) -> Self {
        Self { kernel }
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Estimate the unconditional curve and, when `grouping` is given, one
    /// scaled curve per non-empty group in group order.
    pub fn estimate(
        &self,
        observations: &[f64],
        grouping: Option<Grouping<'_>>,
    ) -> StatsResult<VariableDensity> {
        let bw = bandwidth(observations)?;
        let overall = self.kernel.estimate(observations, bw)?;

        let groups = match grouping {
            Some(grouping) => self.estimate_groups(observations, grouping, bw)?,
            None => Vec::new(),
        };

        Ok(VariableDensity {
            bandwidth: bw,
            overall,
            groups,
        })
    }

    fn estimate_groups(
        &self,
        observations: &[f64],
        grouping: Grouping<'_>,
        bw: f64,
    ) -> StatsResult<Vec<GroupDensity>> {
        if grouping.codes.len() != observations.len() {
            return Err(StatsError::GroupLength {
                expected: observations.len(),
                actual: grouping.codes.len(),
            });
        }

        let mut members: Vec<Vec<f64>> = vec![Vec::new(); grouping.n_groups];
        for (&x, &code) in observations.iter().zip(grouping.codes) {
            if let Some(bucket) = members.get_mut(code) {
                bucket.push(x);
            }
        }

        let total = observations.len() as f64;
        let mut groups = Vec::with_capacity(grouping.n_groups);
        for (group, values) in members.iter().enumerate() {
            if values.is_empty() {
                continue;
            }
            let proportion = values.len() as f64 / total;
            let curve = self.kernel.estimate(values, bw)?.scaled(proportion);
            groups.push(GroupDensity {
                group,
                size: values.len(),
                proportion,
                curve,
            });
        }
        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spread(n: usize, lo: f64, hi: f64) -> Vec<f64> {
        (0..n)
            .map(|i| lo + (hi - lo) * i as f64 / (n - 1) as f64)
            .collect()
    }

    #[test]
    fn test_bandwidth_rule() {
        let data = vec![0.0, 5.0, 10.0, 20.0];
        assert!((bandwidth(&data).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_bandwidth_zero_spread() {
        let err = bandwidth(&[3.0, 3.0, 3.0]).unwrap_err();
        assert_eq!(err, StatsError::ZeroSpread { value: 3.0 });
        assert!(err.is_degenerate());
    }

    #[test]
    fn test_bandwidth_empty() {
        assert_eq!(bandwidth(&[]).unwrap_err(), StatsError::NoObservations);
    }

    #[test]
    fn test_bandwidth_rejects_non_finite() {
        let err = bandwidth(&[0.0, 1.0, 2.0, f64::NAN, 4.0]).unwrap_err();
        assert!(matches!(
            err,
            StatsError::NonFiniteObservation { index: 3, value } if value.is_nan()
        ));
        assert!(err.is_degenerate());

        let err = bandwidth(&[0.0, f64::INFINITY]).unwrap_err();
        assert!(matches!(err, StatsError::NonFiniteObservation { index: 1, .. }));
    }

    #[test]
    fn test_nan_observation_yields_no_curve() {
        let mut data = spread(10, 0.0, 9.0);
        data[3] = f64::NAN;
        let estimator = DensityEstimator::<GaussianKde>::default();
        let err = estimator.estimate(&data, None).unwrap_err();
        assert!(err.is_degenerate());
    }

    #[test]
    fn test_gaussian_kde_integrates_to_one() {
        let data = spread(50, -2.0, 3.0);
        let bw = bandwidth(&data).unwrap();
        let curve = GaussianKde::default().estimate(&data, bw).unwrap();

        assert_eq!(curve.len(), 200);
        assert!((curve.integrate() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_gaussian_kde_support_extends_by_cut() {
        let data = vec![0.0, 10.0];
        let curve = GaussianKde::new(11, 3.0).estimate(&data, 0.5).unwrap();
        assert!((curve.support[0] + 1.5).abs() < 1e-12);
        assert!((curve.support[10] - 11.5).abs() < 1e-12);
    }

    #[test]
    fn test_gaussian_kde_rejects_zero_bandwidth() {
        let result = GaussianKde::default().estimate(&[1.0, 2.0], 0.0);
        assert!(result.is_err());
    }

    #[test]
    fn test_degenerate_variable() {
        let estimator = DensityEstimator::<GaussianKde>::default();
        let err = estimator.estimate(&[7.0; 10], None).unwrap_err();
        assert!(err.is_degenerate());
    }

    #[test]
    fn test_ungrouped_has_no_group_curves() {
        let estimator = DensityEstimator::<GaussianKde>::default();
        let density = estimator.estimate(&spread(20, 0.0, 1.0), None).unwrap();
        assert!(density.groups.is_empty());
        assert!((density.bandwidth - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_equal_groups_carry_half_the_mass() {
        let data: Vec<f64> = spread(40, 0.0, 4.0);
        let codes: Vec<usize> = (0..40).map(|i| i % 2).collect();

        let estimator = DensityEstimator::new(GaussianKde::new(512, 3.0));
        let density = estimator
            .estimate(&data, Some(Grouping::new(&codes, 2)))
            .unwrap();

        let total = density.overall.integrate();
        assert_eq!(density.groups.len(), 2);
        for group in &density.groups {
            assert_eq!(group.size, 20);
            assert!((group.proportion - 0.5).abs() < 1e-12);
            assert!((group.curve.integrate() / total - 0.5).abs() < 1e-2);
        }
    }

    #[test]
    fn test_unequal_groups_scale_by_proportion() {
        let data: Vec<f64> = spread(40, 0.0, 4.0);
        let codes: Vec<usize> = (0..40).map(|i| if i < 10 { 0 } else { 1 }).collect();

        let estimator = DensityEstimator::<GaussianKde>::default();
        let density = estimator
            .estimate(&data, Some(Grouping::new(&codes, 2)))
            .unwrap();

        assert!((density.groups[0].curve.integrate() - 0.25).abs() < 1e-2);
        assert!((density.groups[1].curve.integrate() - 0.75).abs() < 1e-2);
    }

    #[test]
    fn test_empty_group_is_skipped() {
        let data = spread(10, 0.0, 1.0);
        let codes = vec![2; 10];
        let estimator = DensityEstimator::<GaussianKde>::default();
        let density = estimator
            .estimate(&data, Some(Grouping::new(&codes, 3)))
            .unwrap();
        assert_eq!(density.groups.len(), 1);
        assert_eq!(density.groups[0].group, 2);
    }

    #[test]
    fn test_constant_group_uses_shared_bandwidth() {
        let data = vec![1.0, 1.0, 1.0, 2.0, 3.0, 4.0];
        let codes = vec![0, 0, 0, 1, 1, 1];
        let estimator = DensityEstimator::<GaussianKde>::default();
        let density = estimator
            .estimate(&data, Some(Grouping::new(&codes, 2)))
            .unwrap();
        assert_eq!(density.groups.len(), 2);
        assert!(density.groups[0].curve.max_density() > 0.0);
    }

    #[test]
    fn test_group_code_length_mismatch() {
        let estimator = DensityEstimator::<GaussianKde>::default();
        let err = estimator
            .estimate(&[1.0, 2.0, 3.0], Some(Grouping::new(&[0, 1], 2)))
            .unwrap_err();
        assert_eq!(
            err,
            StatsError::GroupLength {
                expected: 3,
                actual: 2
            }
        );
    }
}
