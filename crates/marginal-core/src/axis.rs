//! Axis ranges for plan panels
//!
//! Density axes start from the data limits (always including zero) and are
//! padded by a relative margin on both ends, the way plotting libraries
//! autoscale.

use serde::{Deserialize, Serialize};

/// A closed data range on one axis
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Smallest range holding zero and every finite value
    pub fn enclosing_zero(values: impl IntoIterator<Item = f64>) -> Self {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(Self::new(0.0, 0.0), |range, v| {
                Self::new(range.min.min(v), range.max.max(v))
            })
    }

    /// Expand both ends by `fraction` of the span
    pub fn with_margin(&self, fraction: f64) -> Self {
        let pad = self.span() * fraction;
        Self::new(self.min - pad, self.max + pad)
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}
