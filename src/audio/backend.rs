use crate::error::{VoiceError, VoiceResult};
use tokio::sync::mpsc;

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since capture started
    pub timestamp_ms: u64,
}

/// Configuration for audio backend
#[derive(Debug, Clone)]
pub struct AudioBackendConfig {
    /// Capture sample rate in Hz
    pub sample_rate: u32,
    /// Channel count (1 = mono, 2 = stereo)
    pub channels: u16,
    /// Buffer size in milliseconds (affects latency)
    pub buffer_duration_ms: u64,
}

impl Default for AudioBackendConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000, // 16kHz for speech recognition
            channels: 1,        // Mono
            buffer_duration_ms: 100,
        }
    }
}

/// Audio capture backend trait
///
/// Implementations:
/// - Microphone: subprocess capture via SoX `rec` or ALSA `arecord`
/// - File: read from a WAV file (for testing/batch processing)
#[async_trait::async_trait]
pub trait AudioBackend: Send + Sync {
    /// Start capturing audio
    ///
    /// Returns a channel receiver that will receive audio frames. Fails
    /// with `DeviceUnavailable` when the input device cannot be opened.
    async fn start(&mut self) -> VoiceResult<mpsc::Receiver<AudioFrame>>;

    /// Stop capturing audio and release the input device
    async fn stop(&mut self) -> VoiceResult<()>;

    /// Check if backend is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Audio backend factory
pub struct AudioBackendFactory;

impl AudioBackendFactory {
    /// Create audio backend based on the requested source
    pub async fn create(
        source: AudioSource,
        config: AudioBackendConfig,
    ) -> VoiceResult<Box<dyn AudioBackend>> {
        match source {
            AudioSource::Microphone => {
                let backend = super::mic::MicBackend::auto_detect(config).await?;
                Ok(Box::new(backend))
            }

            AudioSource::File(path) => {
                let backend = super::file::FileBackend::open(&path, config).map_err(|e| {
                    VoiceError::DeviceUnavailable(format!("cannot open {}: {}", path, e))
                })?;
                Ok(Box::new(backend))
            }
        }
    }
}

/// Audio source type
#[derive(Debug, Clone)]
pub enum AudioSource {
    /// Microphone input
    Microphone,
    /// File input (for testing/batch processing)
    File(String),
}
