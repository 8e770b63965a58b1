use crate::application::session::SessionSettings;
use crate::domain::buffer::OrderingPolicy;
use chrono::TimeDelta;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config/dashboard";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub dashboard: DashboardSettings,
    pub telemetry: TelemetrySettings,
    pub inference: InferenceSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    pub title: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelemetrySettings {
    pub capacity: usize,
    pub seed_count: usize,
    pub seed_interval_secs: u32,
    pub refresh_interval_secs: u64,
    pub session_idle_secs: u64,
    #[serde(default)]
    pub ordering_policy: OrderingPolicy,
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InferenceSettings {
    pub endpoint: String,
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl TelemetrySettings {
    /// Seeds beyond the window capacity would be evicted right away, so
    /// `seed_count` is capped at `capacity`.
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            capacity: self.capacity,
            seed_count: self.seed_count.min(self.capacity),
            seed_interval: TimeDelta::seconds(i64::from(self.seed_interval_secs)),
            ordering_policy: self.ordering_policy,
        }
    }

    /// Cadence of the background refresh driver; never zero.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    /// How long a session may go without requests or open streams before the
    /// sweeper drops it. Saturates instead of overflowing.
    pub fn session_idle_timeout(&self) -> TimeDelta {
        i64::try_from(self.session_idle_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX)
    }
}

pub fn load_config() -> anyhow::Result<AppConfig> {
    load_config_from(DEFAULT_CONFIG_PATH)
}

/// Defaults, then the optional file at `path`, then `ROV_*` environment
/// variables (`ROV_SERVER__PORT=9000`).
pub fn load_config_from(path: &str) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("server.max_upload_bytes", 20 * 1024 * 1024)?
        .set_default("dashboard.title", "Mission Overview")?
        .set_default("telemetry.capacity", 60)?
        .set_default("telemetry.seed_count", 60)?
        .set_default("telemetry.seed_interval_secs", 5)?
        .set_default("telemetry.refresh_interval_secs", 5)?
        .set_default("telemetry.session_idle_secs", 600)?
        .set_default(
            "inference.endpoint",
            "https://generativelanguage.googleapis.com",
        )?
        .set_default("inference.model", "gemini-1.5-flash-latest")?
        .set_default("inference.timeout_secs", 30)?
        .add_source(config::File::with_name(path).required(false))
        .add_source(
            config::Environment::with_prefix("ROV")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let mut app_config: AppConfig = settings.try_deserialize()?;

    if app_config.inference.api_key.is_none() {
        app_config.inference.api_key = std::env::var("GOOGLE_API_KEY").ok();
    }

    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = load_config_from("config/does-not-exist").unwrap();

        assert_eq!(config.telemetry.capacity, 60);
        assert_eq!(config.telemetry.seed_count, 60);
        assert_eq!(config.telemetry.refresh_interval(), Duration::from_secs(5));
        assert_eq!(config.telemetry.session_idle_timeout(), TimeDelta::seconds(600));
        assert_eq!(config.inference.model, "gemini-1.5-flash-latest");
        assert_eq!(config.dashboard.title, "Mission Overview");
    }

    #[test]
    fn test_session_settings_mapping() {
        let telemetry = TelemetrySettings {
            capacity: 30,
            seed_count: 10,
            seed_interval_secs: 2,
            refresh_interval_secs: 0,
            session_idle_secs: 120,
            ordering_policy: OrderingPolicy::Clamp,
            rng_seed: Some(9),
        };

        let settings = telemetry.session_settings();
        assert_eq!(settings.capacity, 30);
        assert_eq!(settings.seed_count, 10);
        assert_eq!(settings.seed_interval, TimeDelta::seconds(2));
        assert_eq!(settings.ordering_policy, OrderingPolicy::Clamp);
        assert_eq!(telemetry.refresh_interval(), Duration::from_secs(1));
        assert_eq!(telemetry.session_idle_timeout(), TimeDelta::seconds(120));
    }

    #[test]
    fn test_seed_count_capped_at_capacity() {
        let telemetry = TelemetrySettings {
            capacity: 60,
            seed_count: usize::MAX,
            seed_interval_secs: u32::MAX,
            refresh_interval_secs: 5,
            session_idle_secs: u64::MAX,
            ordering_policy: OrderingPolicy::Strict,
            rng_seed: None,
        };

        let settings = telemetry.session_settings();
        assert_eq!(settings.seed_count, 60);
        assert_eq!(settings.seed_interval, TimeDelta::seconds(i64::from(u32::MAX)));
        assert_eq!(telemetry.session_idle_timeout(), TimeDelta::MAX);
    }

    #[test]
    fn test_bind_address() {
        let server = ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 9000,
            max_upload_bytes: 1024,
        };
        assert_eq!(server.bind_address(), "127.0.0.1:9000");
    }
}
