// Dual-axis chart projection of the telemetry window
use super::buffer::TelemetryBuffer;
use super::telemetry::{TelemetryError, TelemetryPoint};
use serde::Serialize;

pub const DEPTH_AXIS_PADDING: f64 = 10.0;
pub const TEMPERATURE_AXIS_PADDING: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartProjection {
    pub series: Vec<TelemetryPoint>,
    pub depth_range: AxisRange,
    pub temperature_range: AxisRange,
}

/// Project the current window into chart-ready series and padded axis ranges.
/// Ranges are recomputed on every call so they track the visible window.
pub fn project(buffer: &TelemetryBuffer) -> Result<ChartProjection, TelemetryError> {
    let first = buffer.latest()?;

    let mut depth = (first.depth, first.depth);
    let mut temperature = (first.temperature, first.temperature);
    let mut series = Vec::with_capacity(buffer.len());

    for sample in buffer.iter() {
        depth = (depth.0.min(sample.depth), depth.1.max(sample.depth));
        temperature = (
            temperature.0.min(sample.temperature),
            temperature.1.max(sample.temperature),
        );
        series.push(TelemetryPoint::from(sample));
    }

    Ok(ChartProjection {
        series,
        depth_range: AxisRange {
            min: depth.0 - DEPTH_AXIS_PADDING,
            max: depth.1 + DEPTH_AXIS_PADDING,
        },
        temperature_range: AxisRange {
            min: temperature.0 - TEMPERATURE_AXIS_PADDING,
            max: temperature.1 + TEMPERATURE_AXIS_PADDING,
        },
    })
}
