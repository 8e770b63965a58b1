// Mission scalars derived tick by tick
use serde::Serialize;

pub const INITIAL_BATTERY: f64 = 82.0;
pub const INITIAL_PROGRESS: f64 = 45.0;
pub const BATTERY_DRAIN_PER_TICK: f64 = 0.02;
pub const PROGRESS_PER_TICK: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MissionState {
    battery_level: f64,
    mission_progress: f64,
}

impl MissionState {
    pub fn new(battery_level: f64, mission_progress: f64) -> Self {
        Self {
            battery_level: battery_level.clamp(0.0, 100.0),
            mission_progress: mission_progress.clamp(0.0, 100.0),
        }
    }

    pub fn battery_level(&self) -> f64 {
        self.battery_level
    }

    pub fn mission_progress(&self) -> f64 {
        self.mission_progress
    }

    /// Drain the battery and advance progress by one tick.
    pub fn advance(&mut self) {
        self.battery_level = (self.battery_level - BATTERY_DRAIN_PER_TICK).max(0.0);
        self.mission_progress = (self.mission_progress + PROGRESS_PER_TICK).min(100.0);
    }
}

impl Default for MissionState {
    fn default() -> Self {
        Self::new(INITIAL_BATTERY, INITIAL_PROGRESS)
    }
}
