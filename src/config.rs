use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub audio: AudioConfig,
    #[serde(default)]
    pub voice: VoiceTuning,
    pub services: ServicesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub channels: u16,
}

/// Endpoints of the external collaborator services.
#[derive(Debug, Clone, Deserialize)]
pub struct ServicesConfig {
    /// Transcription service (audio in, `{text, confidence}` out).
    pub stt_url: String,
    /// Intent parsing service (`{text}` in, action JSON out).
    pub parse_url: String,
    /// Email execution service base URL (`/draft` and `/send` routes).
    pub gmail_url: String,
    /// Calendar execution service base URL (`/create` route).
    pub calendar_url: String,
}

/// Timing and confidence constants for the confirmation protocol.
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceTuning {
    /// Outer deadline for one spoken-confirmation attempt.
    #[serde(default = "default_confirmation_timeout_ms")]
    pub confirmation_timeout_ms: u64,

    /// How long a listening window stays open to capture speech,
    /// independent of the outer deadline.
    #[serde(default = "default_confirmation_dwell_ms")]
    pub confirmation_dwell_ms: u64,

    /// Pause before the single automatic retry after an unclear response.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Parsed actions at or below this confidence are discarded without
    /// confirmation.
    #[serde(default = "default_parse_confidence_threshold")]
    pub parse_confidence_threshold: f64,

    /// Spoken confirmations at or below this confidence are treated as
    /// unclear.
    #[serde(default = "default_confirm_confidence_threshold")]
    pub confirm_confidence_threshold: f64,
}

fn default_confirmation_timeout_ms() -> u64 {
    15_000
}

fn default_confirmation_dwell_ms() -> u64 {
    4_000
}

fn default_retry_delay_ms() -> u64 {
    3_000
}

fn default_parse_confidence_threshold() -> f64 {
    0.6
}

fn default_confirm_confidence_threshold() -> f64 {
    0.6
}

impl Default for VoiceTuning {
    fn default() -> Self {
        Self {
            confirmation_timeout_ms: default_confirmation_timeout_ms(),
            confirmation_dwell_ms: default_confirmation_dwell_ms(),
            retry_delay_ms: default_retry_delay_ms(),
            parse_confidence_threshold: default_parse_confidence_threshold(),
            confirm_confidence_threshold: default_confirm_confidence_threshold(),
        }
    }
}

impl VoiceTuning {
    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_millis(self.confirmation_timeout_ms)
    }

    pub fn confirmation_dwell(&self) -> Duration {
        Duration::from_millis(self.confirmation_dwell_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
