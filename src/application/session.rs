// Mission session - One isolated telemetry window with its mission scalars
use crate::application::refresh_controller::{RefreshController, StateChange, StateObserver};
use crate::domain::buffer::{OrderingPolicy, TelemetryBuffer, DEFAULT_CAPACITY};
use crate::domain::generator::SampleGenerator;
use crate::domain::mission::MissionState;
use crate::domain::projection::{project, ChartProjection};
use crate::domain::telemetry::{Sample, TelemetryError, Timestamp};
use chrono::TimeDelta;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSettings {
    pub capacity: usize,
    pub seed_count: usize,
    pub seed_interval: TimeDelta,
    pub ordering_policy: OrderingPolicy,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            seed_count: DEFAULT_CAPACITY,
            seed_interval: TimeDelta::seconds(5),
            ordering_policy: OrderingPolicy::default(),
        }
    }
}

pub struct MissionSession {
    buffer: TelemetryBuffer,
    mission: MissionState,
    controller: RefreshController,
}

impl MissionSession {
    /// Seed a fresh window ending at `now` and reset the mission scalars.
    pub fn initialize(
        settings: &SessionSettings,
        mut generator: Box<dyn SampleGenerator>,
        now: Timestamp,
    ) -> Result<Self, TelemetryError> {
        let seeds = generator.seed(settings.seed_count, settings.seed_interval, now);
        let buffer =
            TelemetryBuffer::with_samples(settings.capacity, settings.ordering_policy, seeds)?;

        // Nothing to tick from.
        if buffer.is_empty() {
            return Err(TelemetryError::EmptyBuffer);
        }

        Ok(Self {
            buffer,
            mission: MissionState::default(),
            controller: RefreshController::new(generator),
        })
    }

    pub fn subscribe(&mut self, observer: Box<dyn StateObserver>) {
        self.controller.subscribe(observer);
    }

    pub fn tick(&mut self, now: Timestamp) -> Result<StateChange, TelemetryError> {
        self.controller.tick(&mut self.buffer, &mut self.mission, now)
    }

    pub fn latest(&self) -> Result<&Sample, TelemetryError> {
        self.buffer.latest()
    }

    pub fn snapshot(&self) -> Vec<Sample> {
        self.buffer.snapshot()
    }

    pub fn project(&self) -> Result<ChartProjection, TelemetryError> {
        project(&self.buffer)
    }

    pub fn mission(&self) -> MissionState {
        self.mission
    }

    pub fn ticks(&self) -> u64 {
        self.controller.ticks()
    }
}
