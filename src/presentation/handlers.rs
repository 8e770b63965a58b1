// HTTP request handlers
use crate::application::refresh_controller::StateChange;
use crate::domain::control::ControlCommand;
use crate::domain::dashboard::Dashboard;
use crate::domain::media::{MediaBlob, MediaKind};
use crate::domain::telemetry::TelemetryPoint;
use crate::infrastructure::chunked_json::stream_response;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::infrastructure::refresh_driver::spawn_refresh_driver;
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub id: Uuid,
}

/// One frame of the live dashboard stream.
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum DashboardFrame {
    Overview(Dashboard),
    Tick(StateChange),
    Lagged { skipped: u64 },
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Start a new isolated mission session and its refresh driver
pub async fn create_session(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let handle = state.registry.create(Utc::now())?;
    spawn_refresh_driver(handle.id(), handle.downgrade(), state.refresh_interval);

    Ok(json_response(&SessionCreated { id: handle.id() }, StatusCode::CREATED, false).await?)
}

pub async fn delete_session(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, ApiError> {
    state.registry.remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Advance a session by one tick outside the regular cadence
pub async fn tick_session(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<StateChange>, ApiError> {
    let handle = state.registry.get(id)?;
    let change = handle.lock().tick(Utc::now())?;
    Ok(Json(change))
}

/// Mission overview: metric cards and the depth/temperature chart
pub async fn get_overview(
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let handle = state.registry.get(id)?;
    let dashboard = state.dashboard_service.overview(&handle.lock())?;

    Ok(json_response(&dashboard, StatusCode::OK, accepts_brotli(&headers)).await?)
}

pub async fn get_samples(
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let handle = state.registry.get(id)?;
    let points: Vec<TelemetryPoint> = handle
        .lock()
        .snapshot()
        .iter()
        .map(TelemetryPoint::from)
        .collect();

    Ok(json_response(&points, StatusCode::OK, accepts_brotli(&headers)).await?)
}

/// Live dashboard: the current overview, then one frame per tick
pub async fn stream_session(
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let handle = state.registry.get(id)?;
    let mut updates = handle.subscribe();
    let dashboard = state.dashboard_service.overview(&handle.lock())?;
    drop(handle);

    let frames = async_stream::stream! {
        yield DashboardFrame::Overview(dashboard);
        loop {
            match updates.recv().await {
                Ok(change) => {
                    yield DashboardFrame::Tick(change);
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("Stream for session {} skipped {} ticks", id, skipped);
                    yield DashboardFrame::Lagged { skipped };
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    Ok(stream_response(frames, accepts_brotli(&headers)))
}

/// Mock manual control; acknowledged, nothing is actuated
pub async fn send_control(
    Path((id, command)): Path<(Uuid, String)>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let handle = state.registry.get(id)?;
    let command: ControlCommand = command.parse()?;

    Ok(Json(state.control_service.issue(handle.id(), command)))
}

pub async fn analyze_image(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    analyze_media(&state, MediaKind::Image, &headers, body).await
}

pub async fn analyze_audio(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    analyze_media(&state, MediaKind::Audio, &headers, body).await
}

async fn analyze_media(
    state: &AppState,
    kind: MediaKind,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let mime_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let media = MediaBlob::new(kind, mime_type, body)?;
    let report = state.analysis_service.analyze(media).await?;

    Ok(json_response(&report, StatusCode::OK, accepts_brotli(headers)).await?)
}
