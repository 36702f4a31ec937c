//! Curve export
//!
//! Both exporters read committed geometry only; a drag in progress has no
//! effect on their output. Output is deterministic for a given state and
//! precision setting.

pub mod json;
pub mod svg;

pub use json::{export_coordinates, export_polar};
pub use svg::{export_svg, path_data};

use crate::helper::DrawingHelper;
use crate::settings::MAX_OUTPUT_PRECISION;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// SVG document, one `<path>` per group.
    Svg,
    /// JSON with coordinates relative to the origin point.
    Coordinates,
    /// JSON with angle/distance pairs around the origin point.
    Polar,
}

pub fn export(helper: &DrawingHelper, format: ExportFormat) -> Result<String, serde_json::Error> {
    match format {
        ExportFormat::Svg => Ok(export_svg(helper)),
        ExportFormat::Coordinates => export_coordinates(helper),
        ExportFormat::Polar => export_polar(helper),
    }
}

/// Format a number at the given precision, treating -0 as 0. Precision is
/// capped at [`MAX_OUTPUT_PRECISION`].
pub(crate) fn fixed(n: f64, precision: usize) -> String {
    let n = if n == 0.0 { 0.0 } else { n };
    format!("{:.*}", precision.min(MAX_OUTPUT_PRECISION), n)
}
