// Presentation layer - HTTP surface for the dashboard
pub mod app_state;
pub mod error;
pub mod handlers;
pub mod routes;
