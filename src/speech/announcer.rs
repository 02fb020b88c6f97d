use crate::error::{VoiceError, VoiceResult};
use std::process::Stdio;
use tokio::process::Command;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Text-to-speech output for status prompts.
#[async_trait::async_trait]
pub trait SpeechAnnouncer: Send + Sync {
    /// Speak `text`, cancelling any utterance currently in progress.
    /// Resolves when the utterance completes or is superseded.
    async fn speak(&self, text: &str) -> VoiceResult<()>;

    /// Cancel the in-flight utterance, if any.
    async fn cancel(&self);
}

/// Detect an available speech synthesis program.
///
/// Checks `say` (macOS), then `espeak-ng`, then `espeak`.
pub async fn detect_speech_program() -> Option<&'static str> {
    for cmd in ["say", "espeak-ng", "espeak"] {
        let found = Command::new("which")
            .arg(cmd)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false);
        if found {
            return Some(cmd);
        }
    }
    None
}

/// Speech output through a system TTS subprocess.
///
/// Each utterance runs as one child process; a newer utterance cancels the
/// token of the previous one, which kills its child.
pub struct SubprocessAnnouncer {
    program: &'static str,
    current: Mutex<Option<CancellationToken>>,
}

impl SubprocessAnnouncer {
    pub fn new(program: &'static str) -> Self {
        Self {
            program,
            current: Mutex::new(None),
        }
    }

    /// Create an announcer with an auto-detected TTS program.
    pub async fn auto_detect() -> VoiceResult<Self> {
        let program = detect_speech_program().await.ok_or_else(|| {
            VoiceError::DeviceUnavailable(
                "no speech program found; install espeak or espeak-ng".to_string(),
            )
        })?;
        info!("Detected speech program: {}", program);
        Ok(Self::new(program))
    }
}

#[async_trait::async_trait]
impl SpeechAnnouncer for SubprocessAnnouncer {
    async fn speak(&self, text: &str) -> VoiceResult<()> {
        let token = CancellationToken::new();

        // Latest wins: supersede whatever is currently speaking.
        let previous = {
            let mut current = self.current.lock().await;
            current.replace(token.clone())
        };
        if let Some(previous) = previous {
            previous.cancel();
        }

        debug!("Speaking: {}", text);

        let mut child = Command::new(self.program)
            .arg(text)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                VoiceError::DeviceUnavailable(format!("failed to start {}: {}", self.program, e))
            })?;

        let superseded = tokio::select! {
            _ = token.cancelled() => true,
            status = child.wait() => {
                if let Ok(status) = status {
                    if !status.success() {
                        debug!("{} exited with status {}", self.program, status);
                    }
                }
                false
            }
        };

        if superseded {
            let _ = child.start_kill();
            let _ = child.wait().await;
        }

        Ok(())
    }

    async fn cancel(&self) {
        if let Some(token) = self.current.lock().await.take() {
            token.cancel();
        }
    }
}

/// Announcer that logs prompts instead of speaking them.
///
/// Fallback for hosts without a TTS program; keeps the interaction flowing
/// since speech delivery is non-fatal anyway.
#[derive(Default)]
pub struct LogAnnouncer;

#[async_trait::async_trait]
impl SpeechAnnouncer for LogAnnouncer {
    async fn speak(&self, text: &str) -> VoiceResult<()> {
        info!("[announce] {}", text);
        Ok(())
    }

    async fn cancel(&self) {}
}
