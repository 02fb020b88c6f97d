//! Voice interaction session management
//!
//! This module provides the confirmation-gated voice session core:
//! - `SessionState`/`Phase`: the single source of truth for one interaction
//! - `classify`: confirm/cancel/unclear classification of spoken replies
//! - `ConfirmationListener`: one bounded listening window
//! - `VoiceSessionController`: the top-level state machine
//! - `TaskLog`: record of executed, failed, and cancelled actions

pub mod classifier;
pub mod controller;
pub mod listener;
pub mod log;
pub mod prompts;
pub mod state;

pub use classifier::{classify, ConfirmationKind, ConfirmationOutcome};
pub use controller::VoiceSessionController;
pub use listener::ConfirmationListener;
pub use log::{TaskLog, TaskLogEntry, TaskStatus};
pub use state::{Phase, SessionState};
