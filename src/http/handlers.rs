use super::state::AppState;
use crate::error::VoiceError;
use crate::session::{SessionState, TaskLogEntry};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use tracing::info;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub session: SessionState,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(e: VoiceError) -> axum::response::Response {
    let status = match &e {
        VoiceError::CaptureBusy
        | VoiceError::AlreadyListening
        | VoiceError::NotRecording
        | VoiceError::NotAwaitingConfirmation => StatusCode::CONFLICT,
        VoiceError::DeviceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

async fn status_response(state: &AppState, status: &str) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(StatusResponse {
            status: status.to_string(),
            session: state.controller.snapshot().await,
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /voice/record/start
/// Begin a new interaction by opening the microphone
pub async fn start_recording(State(state): State<AppState>) -> impl IntoResponse {
    info!("HTTP: start recording");

    match state.controller.start_recording().await {
        Ok(()) => status_response(&state, "recording").await,
        Err(e) => error_response(e),
    }
}

/// POST /voice/record/stop
/// Stop recording and run transcription, parsing, and confirmation
pub async fn stop_recording(State(state): State<AppState>) -> impl IntoResponse {
    info!("HTTP: stop recording");

    match state.controller.stop_recording().await {
        Ok(()) => status_response(&state, "processed").await,
        Err(e) => error_response(e),
    }
}

/// POST /voice/confirm
/// Manually confirm the pending action
pub async fn confirm(State(state): State<AppState>) -> impl IntoResponse {
    info!("HTTP: manual confirm");

    match state.controller.confirm().await {
        Ok(()) => status_response(&state, "confirmed").await,
        Err(e) => error_response(e),
    }
}

/// POST /voice/cancel
/// Manually cancel the pending action
pub async fn cancel(State(state): State<AppState>) -> impl IntoResponse {
    info!("HTTP: manual cancel");

    match state.controller.cancel().await {
        Ok(()) => status_response(&state, "cancelled").await,
        Err(e) => error_response(e),
    }
}

/// POST /voice/confirm/listen
/// Re-arm spoken confirmation for the pending action
pub async fn listen_for_confirmation(State(state): State<AppState>) -> impl IntoResponse {
    info!("HTTP: re-arm voice confirmation");

    match state.controller.listen_for_confirmation().await {
        Ok(()) => status_response(&state, "listening").await,
        Err(e) => error_response(e),
    }
}

/// GET /voice/status
/// Current session state
pub async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.controller.snapshot().await)).into_response()
}

/// GET /voice/log
/// Past interactions (completed, failed, cancelled)
pub async fn get_task_log(State(state): State<AppState>) -> impl IntoResponse {
    let entries: Vec<TaskLogEntry> = state.controller.task_entries().await;
    (StatusCode::OK, Json(entries)).into_response()
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
