use super::backend::{AudioBackend, AudioBackendConfig, AudioFrame};
use crate::error::{VoiceError, VoiceResult};
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Recording program used for microphone capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MicProgram {
    /// SoX `rec` command.
    Sox,
    /// Linux ALSA `arecord` command.
    Arecord,
}

impl std::fmt::Display for MicProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MicProgram::Sox => write!(f, "rec"),
            MicProgram::Arecord => write!(f, "arecord"),
        }
    }
}

/// Detect which recording program is available on this system.
///
/// Checks for `rec` (SoX) first, then `arecord` (ALSA).
pub async fn detect_program() -> Option<MicProgram> {
    if command_exists("rec").await {
        return Some(MicProgram::Sox);
    }
    if command_exists("arecord").await {
        return Some(MicProgram::Arecord);
    }
    None
}

async fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Microphone capture backend using a recording subprocess.
///
/// Spawns `rec`/`arecord` streaming raw signed 16-bit PCM to stdout and
/// forwards it as [`AudioFrame`]s until stopped. The subprocess holds the
/// physical input device, so killing it on stop releases the device.
pub struct MicBackend {
    config: AudioBackendConfig,
    program: MicProgram,
    child: Option<Child>,
    reader_task: Option<JoinHandle<()>>,
    capturing: Arc<AtomicBool>,
}

impl MicBackend {
    /// Create a backend for an explicitly chosen recording program.
    pub fn new(config: AudioBackendConfig, program: MicProgram) -> Self {
        Self {
            config,
            program,
            child: None,
            reader_task: None,
            capturing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a backend, auto-detecting the recording program.
    pub async fn auto_detect(config: AudioBackendConfig) -> VoiceResult<Self> {
        let program = detect_program().await.ok_or_else(|| {
            VoiceError::DeviceUnavailable(
                "no recording program found; install SoX (rec) or ALSA (arecord)".to_string(),
            )
        })?;
        info!("Detected recording program: {}", program);
        Ok(Self::new(config, program))
    }

    fn build_command(&self) -> Command {
        let mut cmd = match self.program {
            MicProgram::Sox => {
                let mut c = Command::new("rec");
                c.arg("-q")
                    .arg("-r")
                    .arg(self.config.sample_rate.to_string())
                    .arg("-c")
                    .arg(self.config.channels.to_string())
                    .arg("-b")
                    .arg("16")
                    .arg("-e")
                    .arg("signed-integer")
                    .arg("-t")
                    .arg("raw")
                    .arg("-");
                c
            }
            MicProgram::Arecord => {
                let mut c = Command::new("arecord");
                c.arg("-q")
                    .arg("-f")
                    .arg("S16_LE")
                    .arg("-r")
                    .arg(self.config.sample_rate.to_string())
                    .arg("-c")
                    .arg(self.config.channels.to_string())
                    .arg("-t")
                    .arg("raw");
                c
            }
        };
        cmd.stdout(Stdio::piped()).stderr(Stdio::null());
        cmd.kill_on_drop(true);
        cmd
    }
}

#[async_trait::async_trait]
impl AudioBackend for MicBackend {
    async fn start(&mut self) -> VoiceResult<mpsc::Receiver<AudioFrame>> {
        if self.capturing.load(Ordering::SeqCst) {
            return Err(VoiceError::CaptureBusy);
        }

        let mut child = self.build_command().spawn().map_err(|e| {
            VoiceError::DeviceUnavailable(format!("failed to start {}: {}", self.program, e))
        })?;

        let mut stdout = child.stdout.take().ok_or_else(|| {
            VoiceError::DeviceUnavailable(format!("{} produced no output stream", self.program))
        })?;

        self.capturing.store(true, Ordering::SeqCst);

        // Bytes per frame: samples are 2-byte little-endian.
        let frame_bytes = (self.config.sample_rate as u64
            * self.config.channels as u64
            * 2
            * self.config.buffer_duration_ms
            / 1000) as usize;

        let (tx, rx) = mpsc::channel(32);
        let sample_rate = self.config.sample_rate;
        let channels = self.config.channels;
        let capturing = Arc::clone(&self.capturing);
        let started = Instant::now();

        let reader_task = tokio::spawn(async move {
            let mut pending: Vec<u8> = Vec::with_capacity(frame_bytes * 2);
            let mut buf = vec![0u8; frame_bytes.max(1024)];

            loop {
                let n = match stdout.read(&mut buf).await {
                    Ok(0) => break, // EOF: subprocess exited or was killed
                    Ok(n) => n,
                    Err(e) => {
                        warn!("Microphone stream read error: {}", e);
                        break;
                    }
                };

                if !capturing.load(Ordering::SeqCst) {
                    break;
                }

                pending.extend_from_slice(&buf[..n]);

                while pending.len() >= frame_bytes {
                    let chunk: Vec<u8> = pending.drain(..frame_bytes).collect();
                    let samples: Vec<i16> = chunk
                        .chunks_exact(2)
                        .map(|b| i16::from_le_bytes([b[0], b[1]]))
                        .collect();

                    let frame = AudioFrame {
                        samples,
                        sample_rate,
                        channels,
                        timestamp_ms: started.elapsed().as_millis() as u64,
                    };

                    if tx.send(frame).await.is_err() {
                        return; // receiver dropped
                    }
                }
            }

            // Flush whatever remains as a final short frame.
            if !pending.is_empty() {
                let samples: Vec<i16> = pending
                    .chunks_exact(2)
                    .map(|b| i16::from_le_bytes([b[0], b[1]]))
                    .collect();
                let _ = tx
                    .send(AudioFrame {
                        samples,
                        sample_rate,
                        channels,
                        timestamp_ms: started.elapsed().as_millis() as u64,
                    })
                    .await;
            }
        });

        self.child = Some(child);
        self.reader_task = Some(reader_task);

        info!("Microphone capture started via {}", self.program);

        Ok(rx)
    }

    async fn stop(&mut self) -> VoiceResult<()> {
        if !self.capturing.swap(false, Ordering::SeqCst) {
            return Err(VoiceError::NotRecording);
        }

        if let Some(mut child) = self.child.take() {
            let _ = child.start_kill();
            let _ = child.wait().await;
        }

        if let Some(task) = self.reader_task.take() {
            if let Err(e) = task.await {
                warn!("Microphone reader task panicked: {}", e);
            }
        }

        info!("Microphone capture stopped, device released");

        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        match self.program {
            MicProgram::Sox => "mic-sox",
            MicProgram::Arecord => "mic-arecord",
        }
    }
}

impl Drop for MicBackend {
    fn drop(&mut self) {
        // kill_on_drop covers the subprocess; make the flag consistent.
        self.capturing.store(false, Ordering::SeqCst);
    }
}
