use super::classifier::{classify, ConfirmationOutcome};
use crate::audio::AudioCapture;
use crate::client::TranscriptionClient;
use crate::error::{VoiceError, VoiceResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// One bounded spoken-confirmation listening window.
///
/// A window opens the shared capture, holds it open for a fixed dwell
/// period so the user can speak, then stops, transcribes, and classifies.
/// The whole sequence races an outer deadline and a cancellation token;
/// whichever loses is abandoned, but the audio device is released on every
/// exit path.
///
/// Single-shot: a second `listen` while one is in flight fails with
/// `AlreadyListening` without disturbing the first.
pub struct ConfirmationListener {
    capture: Arc<AudioCapture>,
    transcription: Arc<dyn TranscriptionClient>,
    dwell: Duration,
    listening: AtomicBool,
}

impl ConfirmationListener {
    pub fn new(
        capture: Arc<AudioCapture>,
        transcription: Arc<dyn TranscriptionClient>,
        dwell: Duration,
    ) -> Self {
        Self {
            capture,
            transcription,
            dwell,
            listening: AtomicBool::new(false),
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    /// Run one listening window with the given outer deadline.
    ///
    /// Resolves with a [`ConfirmationOutcome`] (including the Timeout
    /// outcome when the deadline fires first), or an error when capture or
    /// transcription fails, or `Cancelled` when the token fires first.
    pub async fn listen(
        &self,
        deadline: Duration,
        cancel: &CancellationToken,
    ) -> VoiceResult<ConfirmationOutcome> {
        if self.listening.swap(true, Ordering::SeqCst) {
            return Err(VoiceError::AlreadyListening);
        }

        debug!(
            "Confirmation window open (dwell {} ms, deadline {} ms)",
            self.dwell.as_millis(),
            deadline.as_millis()
        );

        let result = tokio::select! {
            outcome = self.run_window() => outcome,
            _ = tokio::time::sleep(deadline) => {
                // The in-flight capture/transcription is abandoned; the
                // device must still be released.
                self.capture.abort().await;
                info!("Confirmation window timed out");
                Ok(ConfirmationOutcome::timeout())
            }
            _ = cancel.cancelled() => {
                self.capture.abort().await;
                info!("Confirmation window pre-empted");
                Err(VoiceError::Cancelled)
            }
        };

        self.listening.store(false, Ordering::SeqCst);
        result
    }

    async fn run_window(&self) -> VoiceResult<ConfirmationOutcome> {
        self.capture.start().await?;

        // Hold the window open so the user can speak, independent of the
        // outer deadline.
        tokio::time::sleep(self.dwell).await;

        let buffer = match self.capture.stop().await {
            Ok(buffer) => buffer,
            Err(e) => {
                self.capture.abort().await;
                return Err(e);
            }
        };

        let transcription = self.transcription.transcribe(buffer).await?;

        debug!(
            "Confirmation heard: \"{}\" (confidence {:.2})",
            transcription.text, transcription.confidence
        );

        Ok(classify(&transcription.text, transcription.confidence))
    }
}
