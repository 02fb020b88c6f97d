//! External collaborator contracts (transcription, intent parsing, action
//! execution) and their HTTP implementations.
//!
//! The core only depends on the traits here; concrete services are injected
//! by the caller, so tests substitute doubles.

pub mod action;
pub mod execution;
pub mod intent;
pub mod transcription;

pub use action::{Action, ActionKind, CalendarAction, EmailAction, WireAction, WireCalendar, WireEmail};
pub use execution::{ActionExecutor, ExecutionReceipt, HttpActionExecutor};
pub use intent::{HttpIntentParser, IntentParser};
pub use transcription::{HttpTranscriptionClient, Transcription, TranscriptionClient};
