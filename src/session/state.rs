use crate::client::Action;
use serde::Serialize;

/// Phase of the voice interaction state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Recording,
    Transcribing,
    Parsing,
    AwaitingConfirmation,
    Executing,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Recording => "recording",
            Phase::Transcribing => "transcribing",
            Phase::Parsing => "parsing",
            Phase::AwaitingConfirmation => "awaiting_confirmation",
            Phase::Executing => "executing",
        };
        write!(f, "{}", name)
    }
}

/// The single source of truth for one voice interaction.
///
/// Exclusively owned and mutated by the session controller; everyone else
/// sees clones. Reset to identical initial values at the start and end of
/// every interaction.
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    pub phase: Phase,
    pub transcript: String,
    /// Transcription confidence in [0,1].
    pub transcript_confidence: f64,
    pub action: Option<Action>,
    /// Latest confirmation-flow status line ("Listening...", "I heard: ...").
    pub confirmation_text: String,
    pub listening_for_confirmation: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            transcript: String::new(),
            transcript_confidence: 1.0,
            action: None,
            confirmation_text: String::new(),
            listening_for_confirmation: false,
        }
    }

    /// Restore every field to its initial value.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
