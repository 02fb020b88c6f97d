// Shared test doubles for the voice session tests.
//
// All external collaborators are trait objects, so these doubles slot into
// the controller exactly where the HTTP implementations would.

#![allow(dead_code)]

use drive_assist::audio::{AudioBackendConfig, AudioBuffer, AudioCapture, FileBackend};
use drive_assist::client::{
    Action, ActionExecutor, ActionKind, CalendarAction, EmailAction, ExecutionReceipt,
    IntentParser, Transcription, TranscriptionClient,
};
use drive_assist::error::{ParseFailureKind, VoiceError, VoiceResult};
use drive_assist::speech::SpeechAnnouncer;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// A capture wrapper around the replayable file backend: one second of
/// quiet tone, streamed instantly.
pub fn test_capture() -> Arc<AudioCapture> {
    let config = AudioBackendConfig {
        sample_rate: 16000,
        channels: 1,
        buffer_duration_ms: 100,
    };
    let samples = vec![500i16; 16000];
    Arc::new(AudioCapture::new(Box::new(FileBackend::from_samples(
        samples, config,
    ))))
}

/// One scripted transcription reply.
pub enum ScriptedReply {
    /// Resolve with the given text and confidence.
    Text(&'static str, f64),
    /// Fail with a transcription error.
    Fail,
    /// Never resolve (the caller's deadline must fire).
    Hang,
}

/// Transcription double that replays scripted replies in order.
///
/// An exhausted script hangs, so tests never see surprise extra windows.
pub struct ScriptedTranscription {
    replies: Mutex<VecDeque<ScriptedReply>>,
    calls: AtomicUsize,
}

impl ScriptedTranscription {
    pub fn new(replies: Vec<ScriptedReply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TranscriptionClient for ScriptedTranscription {
    async fn transcribe(&self, _audio: AudioBuffer) -> VoiceResult<Transcription> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let reply = self.replies.lock().await.pop_front();
        match reply {
            Some(ScriptedReply::Text(text, confidence)) => Ok(Transcription {
                text: text.to_string(),
                confidence,
            }),
            Some(ScriptedReply::Fail) => {
                Err(VoiceError::Transcription("scripted failure".to_string()))
            }
            Some(ScriptedReply::Hang) | None => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}

/// Parser double returning one fixed result.
pub enum ParserScript {
    Parsed(Action),
    Fail(ParseFailureKind),
}

pub struct StubParser {
    script: ParserScript,
}

impl StubParser {
    pub fn parsed(action: Action) -> Arc<Self> {
        Arc::new(Self {
            script: ParserScript::Parsed(action),
        })
    }

    pub fn failing(kind: ParseFailureKind) -> Arc<Self> {
        Arc::new(Self {
            script: ParserScript::Fail(kind),
        })
    }
}

#[async_trait::async_trait]
impl IntentParser for StubParser {
    async fn parse(&self, _text: &str) -> VoiceResult<Action> {
        match &self.script {
            ParserScript::Parsed(action) => Ok(action.clone()),
            ParserScript::Fail(kind) => Err(VoiceError::Parse(*kind)),
        }
    }
}

/// Executor double recording every dispatched action.
pub struct RecordingExecutor {
    pub executed: Mutex<Vec<Action>>,
    fail: bool,
}

impl RecordingExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            executed: Mutex::new(Vec::new()),
            fail: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            executed: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub async fn executed_labels(&self) -> Vec<&'static str> {
        self.executed
            .lock()
            .await
            .iter()
            .map(|a| a.kind_label())
            .collect()
    }
}

#[async_trait::async_trait]
impl ActionExecutor for RecordingExecutor {
    async fn execute(&self, action: &Action) -> VoiceResult<ExecutionReceipt> {
        self.executed.lock().await.push(action.clone());

        if self.fail {
            return Err(VoiceError::Execution("scripted failure".to_string()));
        }

        Ok(ExecutionReceipt {
            id: "test-id".to_string(),
            url: "https://example.com/result".to_string(),
        })
    }
}

/// Announcer double collecting spoken prompts.
pub struct RecordingAnnouncer {
    pub spoken: Mutex<Vec<String>>,
}

impl RecordingAnnouncer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            spoken: Mutex::new(Vec::new()),
        })
    }

    pub async fn spoken_lines(&self) -> Vec<String> {
        self.spoken.lock().await.clone()
    }

    pub async fn said(&self, fragment: &str) -> bool {
        self.spoken
            .lock()
            .await
            .iter()
            .any(|line| line.contains(fragment))
    }
}

#[async_trait::async_trait]
impl SpeechAnnouncer for RecordingAnnouncer {
    async fn speak(&self, text: &str) -> VoiceResult<()> {
        self.spoken.lock().await.push(text.to_string());
        Ok(())
    }

    async fn cancel(&self) {}
}

/// Build an email action with the given parse confidence.
pub fn email_action(confidence: f64, send: bool) -> Action {
    Action {
        confidence,
        kind: ActionKind::Email(EmailAction {
            to: "Sarah".to_string(),
            subject: "Friday".to_string(),
            body: "About Friday".to_string(),
            send,
        }),
    }
}

/// Build a calendar action with the given parse confidence.
pub fn calendar_action(confidence: f64) -> Action {
    Action {
        confidence,
        kind: ActionKind::Calendar(CalendarAction {
            title: "Standup".to_string(),
            datetime: Some("2026-08-10T09:00:00Z".to_string()),
            duration_min: Some(30),
            attendees: vec!["Sarah".to_string()],
        }),
    }
}

/// Poll until `predicate` holds or the retry limit runs out. Relies on
/// paused-clock auto-advance, so waits resolve instantly in tests.
pub async fn wait_until<F, Fut>(what: &str, mut predicate: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..400 {
        if predicate().await {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
    panic!("timed out waiting for: {}", what);
}
