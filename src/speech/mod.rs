//! Spoken status output.
//!
//! One utterance may be in flight at a time; starting a new one cancels the
//! previous (latest wins, announcements are never queued). Speech failures
//! are non-fatal for callers.

mod announcer;

pub use announcer::{detect_speech_program, LogAnnouncer, SpeechAnnouncer, SubprocessAnnouncer};
