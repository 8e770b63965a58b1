// Error responses: `{ "error": { "code": "...", "message": "..." } }`
use crate::application::session_registry::SessionError;
use crate::domain::control::UnknownCommand;
use crate::domain::media::AnalysisError;
use crate::domain::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug)]
pub enum ApiError {
    Session(SessionError),
    Telemetry(TelemetryError),
    Analysis(AnalysisError),
    Control(UnknownCommand),
    Status(StatusCode),
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Session(e @ SessionError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", e.to_string())
            }
            ApiError::Session(SessionError::Telemetry(e)) | ApiError::Telemetry(e) => {
                telemetry_parts(e)
            }
            ApiError::Analysis(e) => match e {
                AnalysisError::InferenceUnavailable(_) => {
                    (StatusCode::BAD_GATEWAY, "INFERENCE_UNAVAILABLE", e.to_string())
                }
                AnalysisError::UnsupportedMedia(_) => (
                    StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    "UNSUPPORTED_MEDIA",
                    e.to_string(),
                ),
                AnalysisError::EmptyMedia => {
                    (StatusCode::BAD_REQUEST, "EMPTY_MEDIA", e.to_string())
                }
            },
            ApiError::Control(e) => (StatusCode::BAD_REQUEST, "UNKNOWN_COMMAND", e.to_string()),
            ApiError::Status(status) => (
                *status,
                "INTERNAL_ERROR",
                status.canonical_reason().unwrap_or("error").to_string(),
            ),
        }
    }
}

fn telemetry_parts(e: &TelemetryError) -> (StatusCode, &'static str, String) {
    match e {
        TelemetryError::OrderingViolation { .. } => {
            (StatusCode::CONFLICT, "ORDERING_VIOLATION", e.to_string())
        }
        TelemetryError::EmptyBuffer | TelemetryError::InvalidCapacity => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "TELEMETRY_INVARIANT",
            e.to_string(),
        ),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!("{}: {}", code, message);
        }
        (status, Json(ErrorBody { error: ErrorDetail { code, message } })).into_response()
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        ApiError::Session(e)
    }
}

impl From<TelemetryError> for ApiError {
    fn from(e: TelemetryError) -> Self {
        ApiError::Telemetry(e)
    }
}

impl From<AnalysisError> for ApiError {
    fn from(e: AnalysisError) -> Self {
        ApiError::Analysis(e)
    }
}

impl From<UnknownCommand> for ApiError {
    fn from(e: UnknownCommand) -> Self {
        ApiError::Control(e)
    }
}

impl From<StatusCode> for ApiError {
    fn from(status: StatusCode) -> Self {
        ApiError::Status(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::from(SessionError::NotFound(Uuid::nil())), StatusCode::NOT_FOUND),
            (
                ApiError::from(AnalysisError::InferenceUnavailable("down".to_string())),
                StatusCode::BAD_GATEWAY,
            ),
            (
                ApiError::from(AnalysisError::UnsupportedMedia("text/plain".to_string())),
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ),
            (ApiError::from(AnalysisError::EmptyMedia), StatusCode::BAD_REQUEST),
            (ApiError::from(UnknownCommand("dive".to_string())), StatusCode::BAD_REQUEST),
            (ApiError::from(TelemetryError::EmptyBuffer), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
