// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use anyhow::Context;
use std::sync::Arc;

use crate::application::analysis_service::AnalysisService;
use crate::application::control_service::ControlService;
use crate::application::dashboard_service::DashboardService;
use crate::application::session_registry::SessionRegistry;
use crate::infrastructure::config::load_config;
use crate::infrastructure::gemini_client::GeminiClient;
use crate::infrastructure::refresh_driver::spawn_session_sweeper;
use crate::presentation::app_state::AppState;
use crate::presentation::routes::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_config().context("Failed to load configuration")?;

    // Inference client (infrastructure layer)
    let inference = Arc::new(GeminiClient::new(&config.inference)?);
    if config.inference.api_key.is_none() {
        tracing::warn!("GOOGLE_API_KEY not set; AI analysis requests will fail");
    }

    // Create services (application layer)
    let registry = Arc::new(
        SessionRegistry::with_random_walk(
            config.telemetry.session_settings(),
            config.telemetry.rng_seed,
        )
        .with_idle_timeout(config.telemetry.session_idle_timeout()),
    );
    spawn_session_sweeper(Arc::downgrade(&registry), config.telemetry.refresh_interval());

    let state = Arc::new(AppState {
        registry,
        dashboard_service: DashboardService::new(config.dashboard.title.clone()),
        analysis_service: AnalysisService::new(inference),
        control_service: ControlService::new(),
        refresh_interval: config.telemetry.refresh_interval(),
    });

    // Build router (presentation layer)
    let router = build_router(state, config.server.max_upload_bytes);

    // Start server
    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(
        "Starting rov-telemetry service on {} (window {} samples, refresh every {:?})",
        addr,
        config.telemetry.capacity,
        config.telemetry.refresh_interval()
    );

    axum::serve(listener, router).await?;

    Ok(())
}
