use crate::error::ParseFailureKind;
use serde::{Deserialize, Serialize};

/// Action JSON as produced by the external parsing service.
///
/// The service enforces `action ∈ {email, calendar, other}` and
/// `confidence ∈ [0,1]` but leaves every nested field optional, so this
/// shape is deliberately lenient. [`Action::try_from`] is the boundary
/// where it is validated into the strict internal form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireAction {
    pub action: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<WireEmail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar: Option<WireCalendar>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireEmail {
    pub to: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub send: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireCalendar {
    pub title: Option<String>,
    pub datetime: Option<String>,
    #[serde(rename = "durationMin")]
    pub duration_min: Option<u32>,
    pub attendees: Option<Vec<String>>,
}

/// A validated, immutable action for one interaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Action {
    /// Parser confidence in [0,1], used as a threshold gate.
    pub confidence: f64,
    pub kind: ActionKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ActionKind {
    Email(EmailAction),
    Calendar(CalendarAction),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailAction {
    pub to: String,
    pub subject: String,
    pub body: String,
    /// true = send immediately, false = create a draft
    pub send: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarAction {
    pub title: String,
    pub datetime: Option<String>,
    pub duration_min: Option<u32>,
    pub attendees: Vec<String>,
}

impl Action {
    /// Short label for logging and the task log.
    pub fn kind_label(&self) -> &'static str {
        match self.kind {
            ActionKind::Email(EmailAction { send: true, .. }) => "email_send",
            ActionKind::Email(EmailAction { send: false, .. }) => "email_draft",
            ActionKind::Calendar(_) => "calendar_create",
        }
    }

    /// Spoken/displayed one-line summary of what confirming will do.
    pub fn summary(&self) -> String {
        match &self.kind {
            ActionKind::Email(email) => {
                let verb = if email.send { "Send" } else { "Draft" };
                format!("{} email to {}: \"{}\"", verb, email.to, email.subject)
            }
            ActionKind::Calendar(cal) => {
                format!("Create calendar event: \"{}\"", cal.title)
            }
        }
    }
}

impl TryFrom<WireAction> for Action {
    type Error = ParseFailureKind;

    fn try_from(wire: WireAction) -> Result<Self, Self::Error> {
        if !(0.0..=1.0).contains(&wire.confidence) {
            return Err(ParseFailureKind::SchemaViolation);
        }

        let kind = match wire.action.as_str() {
            "email" => {
                let email = wire.email.ok_or(ParseFailureKind::SchemaViolation)?;
                let to = email
                    .to
                    .filter(|t| !t.is_empty())
                    .ok_or(ParseFailureKind::SchemaViolation)?;
                ActionKind::Email(EmailAction {
                    to,
                    subject: email.subject.unwrap_or_default(),
                    body: email.body.unwrap_or_default(),
                    send: email.send.unwrap_or(false),
                })
            }
            "calendar" => {
                let cal = wire.calendar.ok_or(ParseFailureKind::SchemaViolation)?;
                let title = cal
                    .title
                    .filter(|t| !t.is_empty())
                    .ok_or(ParseFailureKind::SchemaViolation)?;
                ActionKind::Calendar(CalendarAction {
                    title,
                    datetime: cal.datetime,
                    duration_min: cal.duration_min,
                    attendees: cal.attendees.unwrap_or_default(),
                })
            }
            // "other" passes the external schema but has no executable
            // counterpart here.
            _ => return Err(ParseFailureKind::SchemaViolation),
        };

        Ok(Action {
            confidence: wire.confidence,
            kind,
        })
    }
}
