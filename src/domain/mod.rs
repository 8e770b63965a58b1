// Domain layer - Telemetry core and dashboard models
pub mod buffer;
pub mod control;
pub mod dashboard;
pub mod generator;
pub mod media;
pub mod mission;
pub mod projection;
pub mod telemetry;
