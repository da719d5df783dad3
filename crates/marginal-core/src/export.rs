//! Plan export
//!
//! Serializes a [`RenderPlan`] as JSON so an external renderer can draw it.

use std::io::Write;

use crate::error::PlotResult;
use crate::plan::RenderPlan;

/// Compact JSON
pub fn to_json(plan: &RenderPlan) -> PlotResult<String> {
    Ok(serde_json::to_string(plan)?)
}

/// Indented JSON
pub fn to_json_pretty(plan: &RenderPlan) -> PlotResult<String> {
    Ok(serde_json::to_string_pretty(plan)?)
}

/// Stream JSON into `writer`
pub fn write_json<W: Write>(plan: &RenderPlan, writer: W) -> PlotResult<()> {
    serde_json::to_writer(writer, plan)?;
    Ok(())
}

/// Read a plan back from JSON
pub fn from_json(json: &str) -> PlotResult<RenderPlan> {
    Ok(serde_json::from_str(json)?)
}
