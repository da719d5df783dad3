//! Render plan: everything a renderer needs to draw a marginal distribution plot
//!
//! The plan is a 4x4 grid of panels:
//! - one overview panel with the sorted statistic and dashed rank markers
//! - fifteen variable panels, each with density curves and a jittered scatter
//!
//! All values are precomputed; the renderer only draws.

use marginal_stats::DensityCurve;
use serde::{Deserialize, Serialize};

use crate::axis::AxisRange;
use crate::config::LayoutConfig;
use crate::palette::Color;

/// Complete plan for one invocation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderPlan {
    /// Grid and styling hints
    pub layout: LayoutConfig,
    /// Display name of the statistic
    pub statistic: String,
    /// Label groups in legend order (empty without labels)
    pub groups: Vec<GroupStyle>,
    /// Top-left panel
    pub overview: OverviewPanel,
    /// Remaining panels, in selection order
    pub panels: Vec<VariablePanel>,
}

impl RenderPlan {
    /// Overview plus variable panels
    pub fn panel_count(&self) -> usize {
        1 + self.panels.len()
    }

    /// Variable index shown in each panel
    pub fn variable_indices(&self) -> Vec<usize> {
        self.panels.iter().map(|p| p.variable_index).collect()
    }

    pub fn is_labelled(&self) -> bool {
        !self.groups.is_empty()
    }
}

/// A label group and its color
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupStyle {
    pub name: String,
    pub color: Color,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// Sorted statistic curve with the selected ranks marked
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverviewPanel {
    pub title: String,
    pub x_label: String,
    /// Statistic values in ascending order; x is the position in this vector
    pub sorted_values: Vec<f64>,
    pub line_width: f64,
    pub markers: Vec<RankMarker>,
}

/// Vertical marker at a selected rank
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankMarker {
    pub rank: usize,
    pub y_min: f64,
    pub y_max: f64,
    pub style: LineStyle,
    pub line_width: f64,
}

/// A curve with the color to draw it in
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveSeries {
    pub curve: DensityCurve,
    pub color: Color,
}

/// Density of one label group, scaled by its share of the observations
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupCurve {
    pub group: usize,
    pub proportion: f64,
    pub series: CurveSeries,
}

/// One raw observation in the scatter
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    /// Label group, colored through [`RenderPlan::groups`]
    pub group: Option<usize>,
}

/// Detail panel for one selected variable
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariablePanel {
    /// Position among the selected variables (0-based)
    pub slot: usize,
    /// Rank in the ascending statistic order
    pub rank: usize,
    pub variable_index: usize,
    pub variable_name: String,
    pub statistic_value: f64,
    /// "<statistic> : <value>"
    pub title: String,
    /// "Variable <name>"
    pub x_label: String,
    pub bandwidth: f64,
    /// Raw observations of the variable
    pub observations: Vec<f64>,
    /// Unconditional density curve
    pub overall: CurveSeries,
    /// Per-group curves, empty without labels
    pub group_curves: Vec<GroupCurve>,
    pub scatter: Vec<ScatterPoint>,
    pub point_size: f64,
    /// Range of the density (vertical) axis
    pub density_axis: AxisRange,
    /// Only the first labelled panel shows the group legend
    pub show_legend: bool,
}

/// Render `value` with `digits` significant digits.
///
/// Exponent form is used when the rounded magnitude is below 1e-4 or has
/// at least `digits` integer digits.
pub fn format_significant(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let digits = digits.max(1);

    // Exponent after rounding, so 9.99996 counts as 1e1
    let scientific = format!("{:.*e}", digits - 1, value);
    let exponent: i32 = scientific
        .split_once('e')
        .and_then(|(_, exp)| exp.parse().ok())
        .unwrap_or(0);

    if exponent < -4 || exponent >= digits as i32 {
        return scientific;
    }
    let decimals = (digits as i32 - 1 - exponent) as usize;
    format!("{:.*}", decimals, value)
}

/// Title for a variable panel
pub fn panel_title(statistic: &str, value: f64) -> String {
    format!("{} : {}", statistic, format_significant(value, 4))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_significant() {
        assert_eq!(format_significant(1.23456, 4), "1.235");
        assert_eq!(format_significant(0.012346, 4), "0.01235");
        assert_eq!(format_significant(-2.5, 4), "-2.500");
        assert_eq!(format_significant(0.0, 4), "0");
        assert_eq!(format_significant(f64::NAN, 4), "NaN");
    }

    #[test]
    fn test_format_significant_large_values_use_exponent() {
        assert_eq!(format_significant(12345.6, 4), "1.235e4");
        assert_eq!(format_significant(9999.6, 4), "1.000e4");
        assert_eq!(format_significant(1234.4, 4), "1234");
        assert_eq!(format_significant(0.0000123456, 4), "1.235e-5");
    }

    #[test]
    fn test_format_significant_carry_keeps_digit_count() {
        assert_eq!(format_significant(9.99996, 4), "10.00");
        assert_eq!(format_significant(0.099996, 4), "0.1000");
        assert_eq!(format_significant(-99.996, 4), "-100.0");
    }

    #[test]
    fn test_panel_title() {
        assert_eq!(panel_title("mean", 2.0), "mean : 2.000");
        assert_eq!(panel_title("unique_obs", 17.0), "unique_obs : 17.00");
    }
}
