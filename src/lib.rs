pub mod audio;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod speech;

pub use audio::{
    AudioBackend, AudioBackendConfig, AudioBackendFactory, AudioBuffer, AudioCapture, AudioFrame,
    AudioSource, FileBackend, MicBackend,
};
pub use client::{
    Action, ActionExecutor, ActionKind, CalendarAction, EmailAction, ExecutionReceipt,
    HttpActionExecutor, HttpIntentParser, HttpTranscriptionClient, IntentParser, Transcription,
    TranscriptionClient,
};
pub use config::{Config, VoiceTuning};
pub use error::{ParseFailureKind, VoiceError, VoiceResult};
pub use http::{create_router, AppState};
pub use session::{
    classify, ConfirmationKind, ConfirmationListener, ConfirmationOutcome, Phase, SessionState,
    TaskLog, TaskLogEntry, TaskStatus, VoiceSessionController,
};
pub use speech::{LogAnnouncer, SpeechAnnouncer, SubprocessAnnouncer};
