//! Per-variable summary reducers
//!
//! Each function reduces one variable's observations to a scalar:
//! - Mean, median, population standard deviation
//! - Moment-based skewness and Fisher (excess) kurtosis
//! - Distinct-value and zero counts
//!
//! NaN values are not filtered; they propagate the way they do in the
//! usual array-library reductions.

/// Central moments of a sample (population divisor)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    /// Number of values
    pub count: usize,
    /// Mean (average)
    pub mean: f64,
    /// Second central moment (population variance)
    pub m2: f64,
    /// Third central moment
    pub m3: f64,
    /// Fourth central moment
    pub m4: f64,
}

impl Moments {
    /// Compute the first four moments in two passes
    pub fn from_data<'a, I>(data: I) -> Self
    where
        I: IntoIterator<Item = &'a f64>,
        I::IntoIter: Clone,
    {
        let iter = data.into_iter();
        let count = iter.clone().count();
        if count == 0 {
            return Self {
                count: 0,
                mean: f64::NAN,
                m2: f64::NAN,
                m3: f64::NAN,
                m4: f64::NAN,
            };
        }

        let n = count as f64;
        let mean = iter.clone().sum::<f64>() / n;

        let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
        for &x in iter {
            let d = x - mean;
            let d2 = d * d;
            m2 += d2;
            m3 += d2 * d;
            m4 += d2 * d2;
        }

        Self {
            count,
            mean,
            m2: m2 / n,
            m3: m3 / n,
            m4: m4 / n,
        }
    }

    /// Population standard deviation
    pub fn std_dev(&self) -> f64 {
        self.m2.sqrt()
    }

    /// Biased sample skewness, `m3 / m2^1.5`
    ///
    /// NaN when the variance is zero.
    pub fn skewness(&self) -> f64 {
        if self.m2 == 0.0 {
            return f64::NAN;
        }
        self.m3 / self.m2.powf(1.5)
    }

    /// Biased Fisher kurtosis, `m4 / m2^2 - 3`
    ///
    /// NaN when the variance is zero.
    pub fn kurtosis(&self) -> f64 {
        if self.m2 == 0.0 {
            return f64::NAN;
        }
        self.m4 / (self.m2 * self.m2) - 3.0
    }
}

/// Median; the average of the two middle values for an even count
pub fn median(data: &[f64]) -> f64 {
    let count = data.len();
    if count == 0 {
        return f64::NAN;
    }
    if data.iter().any(|x| x.is_nan()) {
        return f64::NAN;
    }

    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);

    if count % 2 == 0 {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    } else {
        sorted[count / 2]
    }
}

/// Number of distinct values (all NaNs count as one value)
pub fn unique_count(data: &[f64]) -> usize {
    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup_by(|a, b| *a == *b || (a.is_nan() && b.is_nan()));
    sorted.len()
}

/// Number of values exactly equal to zero
pub fn zero_count(data: &[f64]) -> usize {
    data.iter().filter(|&&x| x == 0.0).count()
}

/// Minimum and maximum in one pass, `None` for empty input
pub fn min_max(data: &[f64]) -> Option<(f64, f64)> {
    if data.is_empty() {
        return None;
    }
    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}
