//! Configuration for marginal-core
//!
//! Centralized settings for density estimation, scatter jitter, and the
//! layout hints passed to the renderer.

use marginal_stats::{GaussianKde, Jitter, SELECTION_SIZE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Value out of range: {0}")]
    OutOfRange(String),

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Plot-wide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Fraction of the density range added above and below each panel's axis
    pub axis_margin: f64,
    /// Density estimation settings
    pub kde: KdeConfig,
    /// Scatter jitter settings
    pub jitter: JitterConfig,
    /// Figure layout hints
    pub layout: LayoutConfig,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            axis_margin: 0.05,
            kde: KdeConfig::default(),
            jitter: JitterConfig::default(),
            layout: LayoutConfig::default(),
        }
    }
}

/// Density estimation configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdeConfig {
    /// Number of grid points per curve
    pub grid_size: usize,
    /// Grid extends this many bandwidths beyond the data
    pub cut: f64,
}

impl Default for KdeConfig {
    fn default() -> Self {
        Self {
            grid_size: 200,
            cut: 3.0,
        }
    }
}

impl KdeConfig {
    pub fn kernel(&self) -> GaussianKde {
        GaussianKde::new(self.grid_size, self.cut)
    }
}

/// Scatter jitter configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JitterConfig {
    /// Band center as a fraction of the density-axis span
    pub center_fraction: f64,
    /// Band half-width as a fraction of the density-axis span
    pub spread_fraction: f64,
    /// Seed used when the caller does not supply a random source
    pub seed: u64,
}

impl Default for JitterConfig {
    fn default() -> Self {
        Self {
            center_fraction: 0.5,
            spread_fraction: 0.1,
            seed: 0,
        }
    }
}

impl JitterConfig {
    pub fn jitter(&self) -> Jitter {
        Jitter::new(self.center_fraction, self.spread_fraction)
    }
}

/// Figure layout hints for the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Panel grid rows
    pub rows: usize,
    /// Panel grid columns
    pub cols: usize,
    /// Figure width in inches
    pub figure_width: f64,
    /// Figure height in inches
    pub figure_height: f64,
    /// Horizontal spacing between panels
    pub wspace: f64,
    /// Vertical spacing between panels
    pub hspace: f64,
    /// Line width of the sorted-statistic curve
    pub overview_line_width: f64,
    /// Line width of the dashed rank markers
    pub marker_line_width: f64,
    /// Scatter point size
    pub point_size: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            rows: 4,
            cols: 4,
            figure_width: 15.0,
            figure_height: 12.0,
            wspace: 0.4,
            hspace: 0.4,
            overview_line_width: 2.0,
            marker_line_width: 1.3,
            point_size: 10.0,
        }
    }
}

impl PlotConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.kde.grid_size < 2 {
            return Err(ConfigError::OutOfRange(
                "kde.grid_size must be at least 2".to_string(),
            ));
        }

        if !(self.kde.cut >= 0.0) {
            return Err(ConfigError::OutOfRange(
                "kde.cut must be non-negative".to_string(),
            ));
        }

        if !(self.jitter.spread_fraction >= 0.0) {
            return Err(ConfigError::OutOfRange(
                "jitter.spread_fraction must be non-negative".to_string(),
            ));
        }

        if !(self.axis_margin >= 0.0) {
            return Err(ConfigError::OutOfRange(
                "axis_margin must be non-negative".to_string(),
            ));
        }

        // Overview panel plus one panel per selected variable
        let needed = SELECTION_SIZE + 1;
        if self.layout.rows * self.layout.cols < needed {
            return Err(ConfigError::InvalidLayout(format!(
                "{}x{} grid holds fewer than {} panels",
                self.layout.rows, self.layout.cols, needed
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PlotConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.kde.grid_size, 200);
        assert_eq!(config.layout.rows * config.layout.cols, 16);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = PlotConfig::default();
        let json = config.to_json().unwrap();
        let parsed = PlotConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml() {
        let config = PlotConfig::from_toml(
            r#"
            axis_margin = 0.1

            [kde]
            grid_size = 512

            [jitter]
            seed = 99
            "#,
        )
        .unwrap();

        assert_eq!(config.kde.grid_size, 512);
        assert_eq!(config.kde.cut, 3.0);
        assert_eq!(config.jitter.seed, 99);
        assert_eq!(config.axis_margin, 0.1);
        assert_eq!(config.layout.cols, 4);
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = PlotConfig::default();
        config.jitter.seed = 7;
        let parsed = PlotConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_grid_size() {
        let mut config = PlotConfig::default();
        config.kde.grid_size = 1;
        assert!(matches!(config.validate(), Err(ConfigError::OutOfRange(_))));
    }

    #[test]
    fn test_layout_too_small() {
        let mut config = PlotConfig::default();
        config.layout.rows = 3;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            PlotConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
