// Application layer - Use cases over the telemetry core
pub mod analysis_service;
pub mod control_service;
pub mod dashboard_service;
pub mod inference;
pub mod refresh_controller;
pub mod session;
pub mod session_registry;
