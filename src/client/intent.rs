use super::action::{Action, WireAction};
use crate::error::{ParseFailureKind, VoiceError, VoiceResult};
use serde_json::json;
use tracing::debug;

/// External intent-parsing service contract (transcript in, action out).
///
/// Parse failures are typed and never retried automatically; they surface
/// to the user as "didn't understand".
#[async_trait::async_trait]
pub trait IntentParser: Send + Sync {
    async fn parse(&self, text: &str) -> VoiceResult<Action>;
}

/// HTTP intent parser posting `{text}` and validating the response into a
/// typed [`Action`].
pub struct HttpIntentParser {
    client: reqwest::Client,
    url: String,
}

impl HttpIntentParser {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait::async_trait]
impl IntentParser for HttpIntentParser {
    async fn parse(&self, text: &str) -> VoiceResult<Action> {
        debug!("Parsing intent for transcript ({} chars)", text.len());

        let response = self
            .client
            .post(&self.url)
            .json(&json!({ "text": text }))
            .send()
            .await
            .map_err(|_| VoiceError::Parse(ParseFailureKind::UpstreamUnavailable))?;

        let status = response.status();
        if !status.is_success() {
            // The service reports schema rejections as client errors and
            // malformed model output as server errors.
            let kind = if status.is_client_error() {
                ParseFailureKind::SchemaViolation
            } else {
                ParseFailureKind::UpstreamUnavailable
            };
            return Err(VoiceError::Parse(kind));
        }

        let body = response
            .text()
            .await
            .map_err(|_| VoiceError::Parse(ParseFailureKind::UpstreamUnavailable))?;

        let wire: WireAction = serde_json::from_str(&body)
            .map_err(|_| VoiceError::Parse(ParseFailureKind::InvalidJson))?;

        let action = Action::try_from(wire).map_err(VoiceError::Parse)?;

        debug!(
            "Parsed action {} with confidence {:.2}",
            action.kind_label(),
            action.confidence
        );

        Ok(action)
    }
}
