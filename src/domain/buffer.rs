// Fixed-capacity rolling window of telemetry samples
use super::telemetry::{Sample, TelemetryError};
use serde::Deserialize;
use std::collections::VecDeque;

pub const DEFAULT_CAPACITY: usize = 60;

/// What `append` does with a sample older than the current tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderingPolicy {
    /// Reject the sample with `OrderingViolation`.
    Strict,
    /// Rewrite the sample's timestamp to the tail's and keep it.
    Clamp,
}

impl Default for OrderingPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            OrderingPolicy::Strict
        } else {
            OrderingPolicy::Clamp
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryBuffer {
    samples: VecDeque<Sample>,
    capacity: usize,
    policy: OrderingPolicy,
}

impl TelemetryBuffer {
    pub fn new(capacity: usize, policy: OrderingPolicy) -> Result<Self, TelemetryError> {
        if capacity == 0 {
            return Err(TelemetryError::InvalidCapacity);
        }

        Ok(Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            policy,
        })
    }

    /// Build a buffer pre-filled with `samples`, oldest first.
    /// Only the newest `capacity` samples survive.
    pub fn with_samples<I>(
        capacity: usize,
        policy: OrderingPolicy,
        samples: I,
    ) -> Result<Self, TelemetryError>
    where
        I: IntoIterator<Item = Sample>,
    {
        let mut buffer = Self::new(capacity, policy)?;
        for sample in samples {
            buffer.append(sample)?;
        }
        Ok(buffer)
    }

    /// Push `sample` at the tail, evicting the oldest sample when full.
    pub fn append(&mut self, sample: Sample) -> Result<(), TelemetryError> {
        let sample = match self.samples.back() {
            Some(tail) if sample.timestamp < tail.timestamp => match self.policy {
                OrderingPolicy::Strict => {
                    return Err(TelemetryError::OrderingViolation {
                        tail: tail.timestamp,
                        attempted: sample.timestamp,
                    });
                }
                OrderingPolicy::Clamp => Sample {
                    timestamp: tail.timestamp,
                    ..sample
                },
            },
            _ => sample,
        };

        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
        Ok(())
    }

    pub fn latest(&self) -> Result<&Sample, TelemetryError> {
        self.samples.back().ok_or(TelemetryError::EmptyBuffer)
    }

    /// Owned copy of the window, oldest first.
    pub fn snapshot(&self) -> Vec<Sample> {
        self.samples.iter().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
