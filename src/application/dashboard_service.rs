// Dashboard service - Use case for building the mission overview
use crate::application::session::MissionSession;
use crate::domain::dashboard::{Axis, ChartData, Dashboard, SeriesMeta, TileData};
use crate::domain::telemetry::TelemetryError;

pub const STATUS_NOMINAL: &str = "All Systems Nominal";
pub const STATUS_BATTERY_LOW: &str = "Battery Low";
pub const STATUS_BATTERY_DEPLETED: &str = "Battery Depleted";
const LOW_BATTERY_THRESHOLD: f64 = 20.0;

#[derive(Clone)]
pub struct DashboardService {
    title: String,
}

impl DashboardService {
    pub fn new(title: String) -> Self {
        Self { title }
    }

    /// Read-only render pass: metric cards plus the dual-axis chart.
    pub fn overview(&self, session: &MissionSession) -> Result<Dashboard, TelemetryError> {
        let latest = session.latest()?;
        let mission = session.mission();

        let tiles = vec![
            TileData::new("depth", "CURRENT DEPTH", "m", latest.depth, 1),
            TileData::new("temperature", "WATER TEMPERATURE", "°C", latest.temperature, 1),
            TileData::new("battery", "BATTERY LEVEL", "%", mission.battery_level(), 1),
            TileData::new("progress", "MISSION PROGRESS", "%", mission.mission_progress(), 0),
        ];

        let chart = ChartData::new(
            "depth-temperature",
            "Depth & Temperature",
            "%H:%M:%S",
            vec![
                SeriesMeta::new("depth", "Depth (m)", "#42a5f5", Axis::Left),
                SeriesMeta::new("temperature", "Temperature (°C)", "#ffa726", Axis::Right),
            ],
            session.project()?,
        );

        Ok(Dashboard::new(
            self.title.clone(),
            status_for(mission.battery_level()).to_string(),
            tiles,
            chart,
        ))
    }
}

fn status_for(battery_level: f64) -> &'static str {
    if battery_level <= 0.0 {
        STATUS_BATTERY_DEPLETED
    } else if battery_level < LOW_BATTERY_THRESHOLD {
        STATUS_BATTERY_LOW
    } else {
        STATUS_NOMINAL
    }
}
