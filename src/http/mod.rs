//! HTTP API server for external control (manual confirm/cancel escape hatch)
//!
//! This module provides a REST API for driving the voice session:
//! - POST /voice/record/start - Begin an interaction
//! - POST /voice/record/stop - Stop recording and process the command
//! - POST /voice/confirm - Manually confirm the pending action
//! - POST /voice/cancel - Manually cancel the pending action
//! - POST /voice/confirm/listen - Re-arm spoken confirmation
//! - GET /voice/status - Current session state
//! - GET /voice/log - Past interactions
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
