//! Vertical jitter for the raw-observation scatter.
//!
//! Positions are `height * center + U(-height * spread, height * spread)`
//! where `height` is the span of the panel's density axis. The random
//! source is always injected so plans can be reproduced from a seed.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Placement of the jittered band relative to the density-axis span
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Jitter {
    /// Band center as a fraction of the axis span
    pub center: f64,
    /// Half-width of the band as a fraction of the axis span
    pub spread: f64,
}

impl Jitter {
    pub fn new(center: f64, spread: f64) -> Self {
        Self { center, spread }
    }

    /// Draw `n` vertical positions for an axis of span `height`
    pub fn positions<R: Rng + ?Sized>(&self, rng: &mut R, n: usize, height: f64) -> Vec<f64> {
        let center = height * self.center;
        let half_width = height * self.spread;
        if !(half_width > 0.0) {
            return vec![center; n];
        }
        (0..n)
            .map(|_| center + rng.gen_range(-half_width..half_width))
            .collect()
    }
}

impl Default for Jitter {
    fn default() -> Self {
        Self::new(0.5, 0.1)
    }
}
