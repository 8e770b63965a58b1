// Refresh controller - Advances a session's telemetry one tick at a time
use crate::domain::buffer::TelemetryBuffer;
use crate::domain::generator::SampleGenerator;
use crate::domain::mission::MissionState;
use crate::domain::telemetry::{TelemetryError, TelemetryPoint, Timestamp};
use serde::Serialize;

/// Emitted to observers after every tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateChange {
    pub tick: u64,
    pub latest: Option<TelemetryPoint>,
    pub battery_level: f64,
    pub mission_progress: f64,
    /// Set when the buffer update failed and only the scalars advanced.
    pub degraded: bool,
}

/// Rendering-side listener notified whenever a tick completes.
pub trait StateObserver: Send {
    fn state_changed(&self, change: &StateChange);
}

/// Drives one tick: sample, append, scalar update, notify.
///
/// The controller owns no timer. Whoever hosts the session decides the cadence.
pub struct RefreshController {
    generator: Box<dyn SampleGenerator>,
    observers: Vec<Box<dyn StateObserver>>,
    ticks: u64,
}

impl RefreshController {
    pub fn new(generator: Box<dyn SampleGenerator>) -> Self {
        Self {
            generator,
            observers: Vec::new(),
            ticks: 0,
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn StateObserver>) {
        self.observers.push(observer);
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance `buffer` and `mission` by one tick.
    ///
    /// A failed buffer update does not stop the scalar update: battery and
    /// progress still move, observers still hear about it (with `degraded`
    /// set), and the buffer error is returned afterwards.
    pub fn tick(
        &mut self,
        buffer: &mut TelemetryBuffer,
        mission: &mut MissionState,
        now: Timestamp,
    ) -> Result<StateChange, TelemetryError> {
        let appended = buffer.latest().copied().and_then(|latest| {
            let next = self.generator.next(&latest, now);
            buffer.append(next)
        });

        mission.advance();
        self.ticks += 1;

        let change = StateChange {
            tick: self.ticks,
            latest: buffer.latest().ok().map(TelemetryPoint::from),
            battery_level: mission.battery_level(),
            mission_progress: mission.mission_progress(),
            degraded: appended.is_err(),
        };

        for observer in &self.observers {
            observer.state_changed(&change);
        }

        match appended {
            Ok(()) => {
                tracing::debug!(
                    "Tick {}: battery={:.2} progress={:.2}",
                    change.tick,
                    change.battery_level,
                    change.mission_progress
                );
                Ok(change)
            }
            Err(e) => {
                tracing::warn!("Tick {} degraded, buffer not updated: {}", change.tick, e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::buffer::OrderingPolicy;
    use crate::domain::generator::RandomWalkGenerator;
    use crate::domain::telemetry::Sample;
    use chrono::{TimeDelta, TimeZone, Utc};
    use std::sync::{Arc, Mutex};

    fn start() -> Timestamp {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    #[derive(Default, Clone)]
    struct Recorder(Arc<Mutex<Vec<StateChange>>>);

    impl StateObserver for Recorder {
        fn state_changed(&self, change: &StateChange) {
            self.0.lock().unwrap().push(change.clone());
        }
    }

    fn seeded_buffer(capacity: usize) -> TelemetryBuffer {
        let mut generator = RandomWalkGenerator::from_seed(5);
        let seeds = generator.seed(capacity, TimeDelta::seconds(5), start());
        TelemetryBuffer::with_samples(capacity, OrderingPolicy::Strict, seeds).unwrap()
    }

    #[test]
    fn test_tick_appends_and_notifies() {
        let mut buffer = seeded_buffer(10);
        let mut mission = MissionState::default();
        let mut controller = RefreshController::new(Box::new(RandomWalkGenerator::from_seed(8)));
        let recorder = Recorder::default();
        controller.subscribe(Box::new(recorder.clone()));

        let before = *buffer.latest().unwrap();
        let now = start() + TimeDelta::seconds(5);
        let change = controller.tick(&mut buffer, &mut mission, now).unwrap();

        let after = buffer.latest().unwrap();
        assert_eq!(after.timestamp, now);
        assert!((after.depth - before.depth).abs() <= 0.5 + 1e-9);
        assert!((after.temperature - before.temperature).abs() <= 0.1 + 1e-9);
        assert_eq!(buffer.len(), 10);

        assert_eq!(change.tick, 1);
        assert!(!change.degraded);
        assert_eq!(recorder.0.lock().unwrap().as_slice(), &[change]);
    }

    #[test]
    fn test_scalars_follow_closed_form() {
        let mut buffer = seeded_buffer(60);
        let mut mission = MissionState::default();
        let mut controller = RefreshController::new(Box::new(RandomWalkGenerator::from_seed(8)));

        for n in 1..=500u32 {
            let now = start() + TimeDelta::seconds(5 * n as i64);
            controller.tick(&mut buffer, &mut mission, now).unwrap();

            let battery = (82.0 - 0.02 * n as f64).max(0.0);
            let progress = (45.0 + 0.05 * n as f64).min(100.0);
            assert!((mission.battery_level() - battery).abs() < 1e-9);
            assert!((mission.mission_progress() - progress).abs() < 1e-9);
        }
    }

    #[test]
    fn test_ordering_violation_still_advances_scalars() {
        let mut buffer = seeded_buffer(4);
        let mut mission = MissionState::default();
        let mut controller = RefreshController::new(Box::new(RandomWalkGenerator::from_seed(8)));
        let recorder = Recorder::default();
        controller.subscribe(Box::new(recorder.clone()));

        let stale = start() - TimeDelta::seconds(60);
        let snapshot_before = buffer.snapshot();
        let err = controller.tick(&mut buffer, &mut mission, stale).unwrap_err();

        assert!(matches!(err, TelemetryError::OrderingViolation { .. }));
        assert_eq!(buffer.snapshot(), snapshot_before);
        assert!((mission.battery_level() - 81.98).abs() < 1e-9);
        assert!((mission.mission_progress() - 45.05).abs() < 1e-9);

        let seen = recorder.0.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].degraded);
    }

    #[test]
    fn test_empty_buffer_reports_error() {
        let mut buffer = TelemetryBuffer::new(3, OrderingPolicy::Strict).unwrap();
        let mut mission = MissionState::default();
        let mut controller = RefreshController::new(Box::new(RandomWalkGenerator::from_seed(8)));

        let err = controller.tick(&mut buffer, &mut mission, start()).unwrap_err();
        assert_eq!(err, TelemetryError::EmptyBuffer);
        assert_eq!(controller.ticks(), 1);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_irregular_cadence_is_fine() {
        let mut buffer = seeded_buffer(8);
        let mut mission = MissionState::default();
        let mut controller = RefreshController::new(Box::new(RandomWalkGenerator::from_seed(2)));

        let mut now = start();
        for gap in [0, 1, 17, 0, 300, 2] {
            now += TimeDelta::seconds(gap);
            controller.tick(&mut buffer, &mut mission, now).unwrap();
        }

        let snapshot: Vec<Sample> = buffer.snapshot();
        assert!(snapshot.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert_eq!(controller.ticks(), 6);
    }
}
