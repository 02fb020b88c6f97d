use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Recording control
        .route("/voice/record/start", post(handlers::start_recording))
        .route("/voice/record/stop", post(handlers::stop_recording))
        // Manual confirmation escape hatch
        .route("/voice/confirm", post(handlers::confirm))
        .route("/voice/cancel", post(handlers::cancel))
        .route(
            "/voice/confirm/listen",
            post(handlers::listen_for_confirmation),
        )
        // Session queries
        .route("/voice/status", get(handlers::get_status))
        .route("/voice/log", get(handlers::get_task_log))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
