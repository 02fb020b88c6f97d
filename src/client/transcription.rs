use crate::audio::AudioBuffer;
use crate::error::{VoiceError, VoiceResult};
use serde::Deserialize;
use tracing::debug;

/// Result of one transcription request.
#[derive(Debug, Clone)]
pub struct Transcription {
    pub text: String,
    /// Probability-like score in [0,1]; no guaranteed calibration.
    pub confidence: f64,
}

/// External transcription service contract (audio in, text out).
///
/// Latency is unbounded from the caller's perspective; callers apply their
/// own deadline around this call.
#[async_trait::async_trait]
pub trait TranscriptionClient: Send + Sync {
    async fn transcribe(&self, audio: AudioBuffer) -> VoiceResult<Transcription>;
}

#[derive(Debug, Deserialize)]
struct SttResponse {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
}

/// HTTP transcription client posting WAV audio as multipart form data.
pub struct HttpTranscriptionClient {
    client: reqwest::Client,
    url: String,
}

impl HttpTranscriptionClient {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait::async_trait]
impl TranscriptionClient for HttpTranscriptionClient {
    async fn transcribe(&self, audio: AudioBuffer) -> VoiceResult<Transcription> {
        debug!(
            "Sending {} ms of audio to transcription service",
            audio.duration_ms()
        );

        let part = reqwest::multipart::Part::bytes(audio.into_wav_bytes())
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| VoiceError::Transcription(format!("multipart build failed: {}", e)))?;

        let form = reqwest::multipart::Form::new().part("audio", part);

        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| VoiceError::Transcription(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unreadable error body".to_string());
            return Err(VoiceError::Transcription(format!(
                "service returned {}: {}",
                status, body
            )));
        }

        let body: SttResponse = response
            .json()
            .await
            .map_err(|e| VoiceError::Transcription(format!("bad response body: {}", e)))?;

        // Silent or empty buffers come back as low-confidence empty text,
        // never as a failure.
        Ok(Transcription {
            text: body.text.unwrap_or_default(),
            confidence: body.confidence.unwrap_or(0.0).clamp(0.0, 1.0),
        })
    }
}
