use super::action::{Action, ActionKind};
use crate::error::{VoiceError, VoiceResult};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

/// Receipt returned by an execution service.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionReceipt {
    /// Opaque result identifier.
    #[serde(alias = "draftId", alias = "messageId", alias = "eventId")]
    pub id: String,
    /// Human-followable URL for the created resource.
    pub url: String,
}

/// External action-execution services, one route per action kind.
#[async_trait::async_trait]
pub trait ActionExecutor: Send + Sync {
    async fn execute(&self, action: &Action) -> VoiceResult<ExecutionReceipt>;
}

/// HTTP executor dispatching to the email and calendar services.
pub struct HttpActionExecutor {
    client: reqwest::Client,
    gmail_url: String,
    calendar_url: String,
}

impl HttpActionExecutor {
    pub fn new(gmail_url: String, calendar_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            gmail_url,
            calendar_url,
        }
    }

    async fn post(&self, url: &str, payload: serde_json::Value) -> VoiceResult<ExecutionReceipt> {
        let response = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| VoiceError::Execution(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unreadable error body".to_string());
            return Err(VoiceError::Execution(format!(
                "service returned {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| VoiceError::Execution(format!("bad response body: {}", e)))
    }
}

#[async_trait::async_trait]
impl ActionExecutor for HttpActionExecutor {
    async fn execute(&self, action: &Action) -> VoiceResult<ExecutionReceipt> {
        let receipt = match &action.kind {
            ActionKind::Email(email) => {
                let route = if email.send { "send" } else { "draft" };
                let url = format!("{}/{}", self.gmail_url.trim_end_matches('/'), route);
                self.post(
                    &url,
                    json!({
                        "to": email.to,
                        "subject": email.subject,
                        "body": email.body,
                    }),
                )
                .await?
            }
            ActionKind::Calendar(cal) => {
                let url = format!("{}/create", self.calendar_url.trim_end_matches('/'));
                self.post(
                    &url,
                    json!({
                        "title": cal.title,
                        "datetime": cal.datetime,
                        "durationMin": cal.duration_min,
                        "attendees": cal.attendees,
                    }),
                )
                .await?
            }
        };

        info!(
            "Executed {}: id={} url={}",
            action.kind_label(),
            receipt.id,
            receipt.url
        );

        Ok(receipt)
    }
}
