use thiserror::Error;

/// Errors produced by the voice interaction core.
///
/// Confirmation timeouts and unclear responses are *outcomes*, not errors
/// (see `ConfirmationOutcome`); this enum covers the failure taxonomy that
/// short-circuits an interaction.
#[derive(Debug, Error)]
pub enum VoiceError {
    /// Microphone permission or hardware failure.
    #[error("audio device unavailable: {0}")]
    DeviceUnavailable(String),

    /// A capture session is already open. At most one listening window
    /// (recording or confirmation) may be active at a time.
    #[error("audio capture is already in use")]
    CaptureBusy,

    /// Stop was requested but no capture is in progress.
    #[error("no capture in progress")]
    NotRecording,

    /// A confirmation listening window is already open.
    #[error("already listening for confirmation")]
    AlreadyListening,

    /// A manual confirm/cancel arrived while no action was awaiting
    /// confirmation.
    #[error("no action is awaiting confirmation")]
    NotAwaitingConfirmation,

    /// Transcription service failure (network or service error).
    #[error("transcription failed: {0}")]
    Transcription(String),

    /// Intent parsing failure. Never retried automatically.
    #[error("intent parsing failed: {0}")]
    Parse(ParseFailureKind),

    /// Downstream execution service failure. The action is not retried.
    #[error("action execution failed: {0}")]
    Execution(String),

    /// The operation was pre-empted by a manual override or shutdown.
    #[error("operation cancelled")]
    Cancelled,
}

/// Typed intent-parse failures, matching what the external parsing service
/// reports plus local schema validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFailureKind {
    /// The service response was not valid JSON.
    InvalidJson,
    /// The response was JSON but violated the action schema.
    SchemaViolation,
    /// The parsing service could not be reached or failed upstream.
    UpstreamUnavailable,
}

impl std::fmt::Display for ParseFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseFailureKind::InvalidJson => write!(f, "invalid-json"),
            ParseFailureKind::SchemaViolation => write!(f, "schema-violation"),
            ParseFailureKind::UpstreamUnavailable => write!(f, "upstream-unavailable"),
        }
    }
}

/// Convenience alias for voice operation results.
pub type VoiceResult<T> = Result<T, VoiceError>;
