//! Spoken status prompts, collected in one place so the controller speaks
//! with one voice.

use crate::client::{Action, ActionKind};

pub const MIC_PERMISSION: &str = "Please allow microphone access to use voice commands.";

pub const LOW_CONFIDENCE: &str = "I'm not sure what you meant. Please try again.";

pub const PROCESSING_ERROR: &str = "Sorry, there was an error processing your request.";

pub const NO_RESPONSE: &str =
    "I didn't hear a response. You can say yes to confirm, no to cancel, or use the manual controls.";

pub const UNCLEAR: &str = "I didn't understand. Please say yes to confirm or no to cancel.";

pub const CONFIRMATION_FAILED: &str =
    "I couldn't hear you clearly. Please use the manual controls to confirm or cancel.";

pub const CANCELLED: &str = "Action cancelled";

pub const EXECUTION_FAILED: &str = "Sorry, there was an error completing that action.";

/// Prompt announced when an action enters confirmation.
pub fn confirmation_request(action: &Action) -> String {
    format!(
        "{}. Say yes to confirm or no to cancel.",
        action.summary()
    )
}

/// Success phrase spoken after execution completes.
pub fn success_phrase(action: &Action) -> String {
    match &action.kind {
        ActionKind::Email(email) => {
            if email.send {
                format!("Email sent to {}", email.to)
            } else {
                format!("Draft created for {}", email.to)
            }
        }
        ActionKind::Calendar(cal) => {
            format!("Calendar event \"{}\" created", cal.title)
        }
    }
}
