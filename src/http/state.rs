use crate::session::VoiceSessionController;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The single voice session controller
    pub controller: Arc<VoiceSessionController>,
}

impl AppState {
    pub fn new(controller: Arc<VoiceSessionController>) -> Self {
        Self { controller }
    }
}
