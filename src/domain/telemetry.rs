// Telemetry data domain models
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

pub type Timestamp = DateTime<Utc>;

/// One depth/temperature observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: Timestamp,
    pub depth: f64,
    pub temperature: f64,
}

impl Sample {
    pub fn new(timestamp: Timestamp, depth: f64, temperature: f64) -> Self {
        Self {
            timestamp,
            depth,
            temperature,
        }
    }

    pub fn time_ms(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }
}

/// Wire form of a sample, timestamps flattened to epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TelemetryPoint {
    pub time_ms: i64,
    pub depth: f64,
    pub temperature: f64,
}

impl From<&Sample> for TelemetryPoint {
    fn from(sample: &Sample) -> Self {
        Self {
            time_ms: sample.time_ms(),
            depth: sample.depth,
            temperature: sample.temperature,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TelemetryError {
    #[error("telemetry buffer is empty")]
    EmptyBuffer,

    #[error("sample at {attempted} is older than buffer tail at {tail}")]
    OrderingViolation {
        tail: Timestamp,
        attempted: Timestamp,
    },

    #[error("buffer capacity must be at least 1")]
    InvalidCapacity,
}
