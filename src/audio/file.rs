use super::backend::{AudioBackend, AudioBackendConfig, AudioFrame};
use crate::error::{VoiceError, VoiceResult};
use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// File-based audio backend reading 16-bit PCM WAV.
///
/// Streams the file contents as frames as fast as the receiver drains them,
/// then closes the channel. Each start replays the file from the beginning,
/// so one backend can serve several capture windows. Used for testing and
/// batch processing in place of a live microphone.
pub struct FileBackend {
    config: AudioBackendConfig,
    samples: Arc<Vec<i16>>,
    sample_rate: u32,
    channels: u16,
    capturing: Arc<AtomicBool>,
}

impl FileBackend {
    /// Open a WAV file and prepare it for streaming.
    pub fn open(path: &str, config: AudioBackendConfig) -> Result<Self> {
        let mut reader = hound::WavReader::open(path)
            .with_context(|| format!("failed to open WAV file: {}", path))?;

        let spec = reader.spec();
        let samples: Vec<i16> = reader
            .samples::<i16>()
            .collect::<std::result::Result<_, _>>()
            .context("failed to decode WAV samples")?;

        Ok(Self {
            config,
            samples: Arc::new(samples),
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            capturing: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Build a backend directly from PCM samples (test fixture path).
    pub fn from_samples(samples: Vec<i16>, config: AudioBackendConfig) -> Self {
        let sample_rate = config.sample_rate;
        let channels = config.channels;
        Self {
            config,
            samples: Arc::new(samples),
            sample_rate,
            channels,
            capturing: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[async_trait::async_trait]
impl AudioBackend for FileBackend {
    async fn start(&mut self) -> VoiceResult<mpsc::Receiver<AudioFrame>> {
        if self.capturing.load(Ordering::SeqCst) {
            return Err(VoiceError::CaptureBusy);
        }

        self.capturing.store(true, Ordering::SeqCst);

        let frame_len = (self.config.sample_rate as u64
            * self.config.channels as u64
            * self.config.buffer_duration_ms
            / 1000)
            .max(1) as usize;

        let samples = Arc::clone(&self.samples);
        let sample_rate = self.sample_rate;
        let channels = self.channels;
        let (tx, rx) = mpsc::channel(32);

        tokio::spawn(async move {
            let frame_ms = (frame_len as u64 * 1000) / (sample_rate as u64 * channels as u64);
            for (i, chunk) in samples.chunks(frame_len).enumerate() {
                let frame = AudioFrame {
                    samples: chunk.to_vec(),
                    sample_rate,
                    channels,
                    timestamp_ms: i as u64 * frame_ms,
                };
                if tx.send(frame).await.is_err() {
                    break;
                }
            }
        });

        Ok(rx)
    }

    async fn stop(&mut self) -> VoiceResult<()> {
        if !self.capturing.swap(false, Ordering::SeqCst) {
            return Err(VoiceError::NotRecording);
        }
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "file"
    }
}
