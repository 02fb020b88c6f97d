use super::classifier::ConfirmationKind;
use super::listener::ConfirmationListener;
use super::log::{TaskLog, TaskLogEntry, TaskStatus};
use super::prompts;
use super::state::{Phase, SessionState};
use crate::audio::AudioCapture;
use crate::client::{ActionExecutor, IntentParser, TranscriptionClient};
use crate::config::VoiceTuning;
use crate::error::{VoiceError, VoiceResult};
use crate::speech::SpeechAnnouncer;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Top-level voice interaction state machine.
///
/// Drives one interaction through
/// Idle → Recording → Transcribing → Parsing → AwaitingConfirmation →
/// Executing → Idle, with an error/reset edge from every phase back to
/// Idle. Owns the [`SessionState`] exclusively; callers observe it through
/// [`snapshot`] and drive it only through the public operations.
///
/// Every reset bumps an interaction generation counter. Deferred work (the
/// unclear-retry, a pre-empted listener's outcome) re-checks generation and
/// phase before touching state, so stale effects are no-ops.
///
/// [`snapshot`]: VoiceSessionController::snapshot
pub struct VoiceSessionController {
    state: Mutex<SessionState>,
    capture: Arc<AudioCapture>,
    transcription: Arc<dyn TranscriptionClient>,
    parser: Arc<dyn IntentParser>,
    executor: Arc<dyn ActionExecutor>,
    announcer: Arc<dyn SpeechAnnouncer>,
    listener: ConfirmationListener,
    tuning: VoiceTuning,
    task_log: TaskLog,
    generation: AtomicU64,
    listen_cancel: Mutex<Option<CancellationToken>>,
}

impl VoiceSessionController {
    pub fn new(
        capture: Arc<AudioCapture>,
        transcription: Arc<dyn TranscriptionClient>,
        parser: Arc<dyn IntentParser>,
        executor: Arc<dyn ActionExecutor>,
        announcer: Arc<dyn SpeechAnnouncer>,
        tuning: VoiceTuning,
    ) -> Self {
        let listener = ConfirmationListener::new(
            Arc::clone(&capture),
            Arc::clone(&transcription),
            tuning.confirmation_dwell(),
        );

        Self {
            state: Mutex::new(SessionState::new()),
            capture,
            transcription,
            parser,
            executor,
            announcer,
            listener,
            tuning,
            task_log: TaskLog::new(),
            generation: AtomicU64::new(0),
            listen_cancel: Mutex::new(None),
        }
    }

    /// Current session state (cloned; callers never mutate it).
    pub async fn snapshot(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    /// Past interactions, newest last.
    pub async fn task_entries(&self) -> Vec<TaskLogEntry> {
        self.task_log.entries().await
    }

    pub fn is_listening_for_confirmation(&self) -> bool {
        self.listener.is_listening()
    }

    /// Begin a new interaction: open the microphone and start recording.
    pub async fn start_recording(&self) -> VoiceResult<()> {
        {
            let state = self.state.lock().await;
            if state.phase != Phase::Idle {
                return Err(VoiceError::CaptureBusy);
            }
        }

        if let Err(e) = self.capture.start().await {
            if matches!(e, VoiceError::DeviceUnavailable(_)) {
                self.announce(prompts::MIC_PERMISSION).await;
            }
            return Err(e);
        }

        let mut state = self.state.lock().await;
        state.reset();
        state.phase = Phase::Recording;

        info!("Recording started");

        Ok(())
    }

    /// Stop recording and run the command through transcription, parsing,
    /// and (when confident enough) into spoken confirmation.
    pub async fn stop_recording(self: &Arc<Self>) -> VoiceResult<()> {
        {
            let mut state = self.state.lock().await;
            if state.phase != Phase::Recording {
                return Err(VoiceError::NotRecording);
            }
            state.phase = Phase::Transcribing;
        }

        let buffer = match self.capture.stop().await {
            Ok(buffer) => buffer,
            Err(e) => return self.fail_interaction(e).await,
        };

        let transcription = match self.transcription.transcribe(buffer).await {
            Ok(t) => t,
            Err(e) => return self.fail_interaction(e).await,
        };

        info!(
            "Transcribed: \"{}\" (confidence {:.2})",
            transcription.text, transcription.confidence
        );

        {
            let mut state = self.state.lock().await;
            if state.phase != Phase::Transcribing {
                return Err(VoiceError::Cancelled);
            }
            state.transcript = transcription.text.clone();
            state.transcript_confidence = transcription.confidence;
            state.phase = Phase::Parsing;
        }

        let action = match self.parser.parse(&transcription.text).await {
            Ok(action) => action,
            Err(e) => return self.fail_interaction(e).await,
        };

        // Exclusive threshold: an action at exactly the threshold is
        // discarded, never shown for confirmation.
        if action.confidence <= self.tuning.parse_confidence_threshold {
            info!(
                "Parse confidence {:.2} at or below threshold {:.2}, discarding",
                action.confidence, self.tuning.parse_confidence_threshold
            );
            self.announce(prompts::LOW_CONFIDENCE).await;
            self.reset_interaction().await;
            return Ok(());
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let request = prompts::confirmation_request(&action);
        {
            let mut state = self.state.lock().await;
            if state.phase != Phase::Parsing {
                return Err(VoiceError::Cancelled);
            }
            state.action = Some(action.clone());
            state.phase = Phase::AwaitingConfirmation;
        }

        info!(
            "Awaiting confirmation for {} (confidence {:.2})",
            action.kind_label(),
            action.confidence
        );

        self.announce(&request).await;
        self.spawn_confirmation_cycle(generation);

        Ok(())
    }

    /// Manual confirm. Accepted whenever an action is awaiting
    /// confirmation; pre-empts any in-flight listening window.
    pub async fn confirm(&self) -> VoiceResult<()> {
        let generation = self.generation.load(Ordering::SeqCst);
        self.preempt_listener().await;

        if self.execute_confirmed(generation).await {
            Ok(())
        } else {
            Err(VoiceError::NotAwaitingConfirmation)
        }
    }

    /// Manual cancel. Accepted whenever an action is awaiting confirmation;
    /// pre-empts any in-flight listening window.
    pub async fn cancel(&self) -> VoiceResult<()> {
        let generation = self.generation.load(Ordering::SeqCst);
        self.preempt_listener().await;

        if self.cancel_awaiting(generation).await {
            Ok(())
        } else {
            Err(VoiceError::NotAwaitingConfirmation)
        }
    }

    /// Re-arm spoken confirmation after a timeout or unclear fallback left
    /// the session waiting on manual input.
    pub async fn listen_for_confirmation(self: &Arc<Self>) -> VoiceResult<()> {
        let generation = self.generation.load(Ordering::SeqCst);
        if !self.awaiting(generation).await {
            return Err(VoiceError::NotAwaitingConfirmation);
        }
        if self.listener.is_listening() {
            return Err(VoiceError::AlreadyListening);
        }

        self.spawn_confirmation_cycle(generation);
        Ok(())
    }

    fn spawn_confirmation_cycle(self: &Arc<Self>, generation: u64) {
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            controller.confirmation_cycle(generation).await;
        });
    }

    /// One confirmation cycle: listen, classify, act. An unclear response
    /// earns exactly one automatic retry after a fixed pause; a timeout or
    /// a second unclear leaves manual controls as the only path.
    async fn confirmation_cycle(self: Arc<Self>, generation: u64) {
        let token = CancellationToken::new();
        *self.listen_cancel.lock().await = Some(token.clone());

        let mut retried = false;

        loop {
            if !self.awaiting(generation).await {
                return;
            }

            {
                let mut state = self.state.lock().await;
                state.listening_for_confirmation = true;
                state.confirmation_text = "Listening for your response...".to_string();
            }

            let result = self
                .listener
                .listen(self.tuning.confirmation_timeout(), &token)
                .await;

            {
                let mut state = self.state.lock().await;
                state.listening_for_confirmation = false;
            }

            // A manual override may have landed while we were listening;
            // its transition wins and this outcome is discarded.
            if !self.awaiting(generation).await {
                return;
            }

            let outcome = match result {
                Ok(outcome) => outcome,
                Err(VoiceError::Cancelled) => return,
                // Another cycle owns the window (re-armed during our retry
                // pause); let it drive the confirmation.
                Err(VoiceError::AlreadyListening) => return,
                Err(e) => {
                    warn!("Voice confirmation failed: {}", e);
                    self.set_confirmation_text(
                        "Voice confirmation failed. Please use the manual controls.",
                    )
                    .await;
                    self.announce(prompts::CONFIRMATION_FAILED).await;
                    return;
                }
            };

            match outcome.kind {
                ConfirmationKind::Timeout => {
                    self.set_confirmation_text(
                        "No response detected. You can retry by voice or use the manual controls.",
                    )
                    .await;
                    self.announce(prompts::NO_RESPONSE).await;
                    // No automatic retry for a timeout.
                    return;
                }

                ConfirmationKind::Cancel => {
                    self.set_confirmation_text(&format!("I heard: \"{}\"", outcome.raw_text))
                        .await;
                    self.cancel_awaiting(generation).await;
                    return;
                }

                ConfirmationKind::Confirm
                    if outcome.confidence > self.tuning.confirm_confidence_threshold =>
                {
                    self.set_confirmation_text(&format!("I heard: \"{}\"", outcome.raw_text))
                        .await;
                    self.execute_confirmed(generation).await;
                    return;
                }

                // Unclear, or a confirm heard too faintly to trust.
                _ => {
                    self.set_confirmation_text(
                        "I didn't understand. Please say yes to confirm or no to cancel.",
                    )
                    .await;
                    self.announce(prompts::UNCLEAR).await;

                    if retried {
                        // Second unclear: stop auto-retrying, leave manual
                        // controls as the only path.
                        return;
                    }
                    retried = true;

                    tokio::time::sleep(self.tuning.retry_delay()).await;
                    // If a manual action landed during the pause, the guard
                    // at the top of the loop makes this retry a no-op.
                }
            }
        }
    }

    /// Atomically verify the interaction is still awaiting confirmation and
    /// move it to Executing, then dispatch the action. Returns false when
    /// the guard fails (stale generation or wrong phase).
    async fn execute_confirmed(&self, generation: u64) -> bool {
        let action = {
            let mut state = self.state.lock().await;
            if self.generation.load(Ordering::SeqCst) != generation
                || state.phase != Phase::AwaitingConfirmation
            {
                return false;
            }
            state.phase = Phase::Executing;
            state.action.clone()
        };

        let Some(action) = action else {
            self.reset_interaction().await;
            return false;
        };

        info!("Executing {}", action.kind_label());

        match self.executor.execute(&action).await {
            Ok(receipt) => {
                let phrase = prompts::success_phrase(&action);
                self.task_log
                    .record(
                        action.kind_label(),
                        TaskStatus::Completed,
                        format!("{} ({})", phrase, receipt.url),
                    )
                    .await;
                self.announce(&phrase).await;
            }
            Err(e) => {
                // Announced and logged; the action is not retried.
                error!("Execution failed: {}", e);
                self.task_log
                    .record(action.kind_label(), TaskStatus::Failed, action.summary())
                    .await;
                self.announce(prompts::EXECUTION_FAILED).await;
            }
        }

        // Full reset on success and failure alike.
        self.reset_interaction().await;
        true
    }

    /// Cancel the awaiting action. Returns false when the guard fails.
    async fn cancel_awaiting(&self, generation: u64) -> bool {
        let action = {
            let mut state = self.state.lock().await;
            if self.generation.load(Ordering::SeqCst) != generation
                || state.phase != Phase::AwaitingConfirmation
            {
                return false;
            }
            state.action.take()
        };

        if let Some(action) = action {
            info!("Cancelled {}", action.kind_label());
            self.task_log
                .record(action.kind_label(), TaskStatus::Cancelled, action.summary())
                .await;
        }

        self.announce(prompts::CANCELLED).await;
        self.reset_interaction().await;
        true
    }

    /// Convert a pipeline failure into a spoken announcement plus a full
    /// reset; the error still propagates to the caller.
    async fn fail_interaction(&self, e: VoiceError) -> VoiceResult<()> {
        error!("Interaction failed: {}", e);
        self.announce(prompts::PROCESSING_ERROR).await;
        self.reset_interaction().await;
        Err(e)
    }

    /// Reset to Idle: bump the generation (invalidating deferred work),
    /// pre-empt any listener, release the device if held, clear state.
    async fn reset_interaction(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.preempt_listener().await;

        if self.capture.is_recording() {
            self.capture.abort().await;
        }

        self.state.lock().await.reset();
    }

    async fn preempt_listener(&self) {
        if let Some(token) = self.listen_cancel.lock().await.take() {
            token.cancel();
        }
    }

    async fn awaiting(&self, generation: u64) -> bool {
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        self.state.lock().await.phase == Phase::AwaitingConfirmation
    }

    async fn set_confirmation_text(&self, text: &str) {
        self.state.lock().await.confirmation_text = text.to_string();
    }

    /// Speak a status prompt. Speech delivery failures are non-fatal.
    async fn announce(&self, text: &str) {
        if let Err(e) = self.announcer.speak(text).await {
            warn!("Speech output failed (continuing): {}", e);
        }
    }
}
