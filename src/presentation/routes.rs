// Route table for the dashboard service
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    analyze_audio, analyze_image, create_session, delete_session, get_overview, get_samples,
    health_check, send_control, stream_session, tick_session,
};
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    // Compression is handled per response, so no CompressionLayer here.
    Router::new()
        .route("/healthz", get(health_check))
        .route("/sessions", post(create_session))
        .route("/sessions/:id", delete(delete_session))
        .route("/sessions/:id/tick", post(tick_session))
        .route("/sessions/:id/overview", get(get_overview))
        .route("/sessions/:id/samples", get(get_samples))
        .route("/sessions/:id/stream", get(stream_session))
        .route("/sessions/:id/controls/:command", post(send_control))
        .route("/analysis/image", post(analyze_image))
        .route("/analysis/audio", post(analyze_audio))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
