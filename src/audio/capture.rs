use super::backend::AudioBackend;
use crate::error::{VoiceError, VoiceResult};
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// One completed recording segment, encoded as 16-bit PCM WAV.
///
/// Produced by [`AudioCapture::stop`], consumed exactly once by the
/// transcription client.
#[derive(Debug)]
pub struct AudioBuffer {
    wav: Vec<u8>,
    sample_count: usize,
    sample_rate: u32,
    channels: u16,
}

impl AudioBuffer {
    pub fn wav_bytes(&self) -> &[u8] {
        &self.wav
    }

    pub fn into_wav_bytes(self) -> Vec<u8> {
        self.wav
    }

    /// True when the segment contains no samples (e.g. the window closed
    /// before any audio arrived).
    pub fn is_silent(&self) -> bool {
        self.sample_count == 0
    }

    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0;
        }
        self.sample_count as u64 * 1000 / (self.sample_rate as u64 * self.channels as u64)
    }
}

struct Collector {
    handle: JoinHandle<(Vec<i16>, u32, u16)>,
}

/// Scoped microphone acquisition with a start/stop lifecycle.
///
/// Wraps an [`AudioBackend`] and accumulates its frames into a single
/// [`AudioBuffer`]. At most one capture session may be open at a time;
/// starting while one is open fails with `CaptureBusy`. The device is
/// released on every exit path: `stop` produces a buffer, [`abort`]
/// releases without one.
///
/// [`abort`]: AudioCapture::abort
pub struct AudioCapture {
    backend: Mutex<Box<dyn AudioBackend>>,
    recording: AtomicBool,
    collector: Mutex<Option<Collector>>,
}

impl AudioCapture {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend: Mutex::new(backend),
            recording: AtomicBool::new(false),
            collector: Mutex::new(None),
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recording.load(Ordering::SeqCst)
    }

    /// Open the input device and begin accumulating audio.
    pub async fn start(&self) -> VoiceResult<()> {
        if self.recording.swap(true, Ordering::SeqCst) {
            return Err(VoiceError::CaptureBusy);
        }

        let mut backend = self.backend.lock().await;
        let mut rx = match backend.start().await {
            Ok(rx) => rx,
            Err(e) => {
                self.recording.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        info!("Capture started via {} backend", backend.name());
        drop(backend);

        let handle = tokio::spawn(async move {
            let mut samples = Vec::new();
            let mut sample_rate = 16000;
            let mut channels = 1;

            while let Some(frame) = rx.recv().await {
                sample_rate = frame.sample_rate;
                channels = frame.channels;
                samples.extend_from_slice(&frame.samples);
            }

            (samples, sample_rate, channels)
        });

        *self.collector.lock().await = Some(Collector { handle });

        Ok(())
    }

    /// Stop capturing, release the device, and return the recorded segment.
    pub async fn stop(&self) -> VoiceResult<AudioBuffer> {
        if !self.recording.load(Ordering::SeqCst) {
            return Err(VoiceError::NotRecording);
        }

        let stop_result = self.backend.lock().await.stop().await;
        let collector = self.collector.lock().await.take();
        self.recording.store(false, Ordering::SeqCst);

        stop_result?;

        let collector = collector.ok_or(VoiceError::NotRecording)?;
        let (samples, sample_rate, channels) = collector
            .handle
            .await
            .map_err(|e| VoiceError::DeviceUnavailable(format!("capture task failed: {}", e)))?;

        info!(
            "Capture stopped: {} samples at {} Hz",
            samples.len(),
            sample_rate
        );

        encode_wav(&samples, sample_rate, channels)
    }

    /// Release the device without producing a buffer.
    ///
    /// Used when an outer deadline or manual override abandons an in-flight
    /// window. Idempotent: a no-op when nothing is recording.
    pub async fn abort(&self) {
        if !self.recording.swap(false, Ordering::SeqCst) {
            return;
        }

        if let Err(e) = self.backend.lock().await.stop().await {
            warn!("Failed to stop backend during abort: {}", e);
        }

        if let Some(collector) = self.collector.lock().await.take() {
            collector.handle.abort();
        }

        info!("Capture aborted, device released");
    }
}

fn encode_wav(samples: &[i16], sample_rate: u32, channels: u16) -> VoiceResult<AudioBuffer> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| VoiceError::DeviceUnavailable(format!("WAV encoding failed: {}", e)))?;

        for &sample in samples {
            writer
                .write_sample(sample)
                .map_err(|e| VoiceError::DeviceUnavailable(format!("WAV encoding failed: {}", e)))?;
        }

        writer
            .finalize()
            .map_err(|e| VoiceError::DeviceUnavailable(format!("WAV encoding failed: {}", e)))?;
    }

    Ok(AudioBuffer {
        wav: cursor.into_inner(),
        sample_count: samples.len(),
        sample_rate,
        channels,
    })
}
