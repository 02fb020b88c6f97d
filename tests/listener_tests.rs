// Tests for the bounded confirmation listening window.
//
// These run on a paused tokio clock; the dwell and deadline timers
// auto-advance, so scripted windows resolve instantly.

mod common;

use common::{test_capture, ScriptedReply, ScriptedTranscription};
use drive_assist::error::VoiceError;
use drive_assist::session::{ConfirmationKind, ConfirmationListener};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const DEADLINE: Duration = Duration::from_millis(15_000);
const DWELL: Duration = Duration::from_millis(4_000);

fn listener_with(replies: Vec<ScriptedReply>) -> (Arc<ConfirmationListener>, Arc<ScriptedTranscription>) {
    let capture = test_capture();
    let transcription = ScriptedTranscription::new(replies);
    let listener = Arc::new(ConfirmationListener::new(
        Arc::clone(&capture),
        transcription.clone(),
        DWELL,
    ));
    (listener, transcription)
}

#[tokio::test(start_paused = true)]
async fn test_window_classifies_spoken_yes() {
    let (listener, _) = listener_with(vec![ScriptedReply::Text("yes", 0.9)]);
    let token = CancellationToken::new();

    let outcome = listener
        .listen(DEADLINE, &token)
        .await
        .expect("window should resolve");

    assert_eq!(outcome.kind, ConfirmationKind::Confirm);
    assert!((outcome.confidence - 0.81).abs() < 1e-9);
    assert!(!listener.is_listening(), "window should be closed");
}

#[tokio::test(start_paused = true)]
async fn test_deadline_elapsing_yields_timeout_outcome() {
    // Transcription never resolves; the outer deadline must fire.
    let (listener, _) = listener_with(vec![ScriptedReply::Hang]);
    let token = CancellationToken::new();

    let outcome = listener
        .listen(DEADLINE, &token)
        .await
        .expect("timeout is an outcome, not an error");

    assert_eq!(outcome.kind, ConfirmationKind::Timeout);
    assert_eq!(outcome.confidence, 0.0);
    assert_eq!(outcome.raw_text, "timeout");
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_window_releases_device() {
    let capture = test_capture();
    let transcription = ScriptedTranscription::new(vec![ScriptedReply::Hang]);
    let listener = Arc::new(ConfirmationListener::new(
        Arc::clone(&capture),
        transcription,
        DWELL,
    ));
    let token = CancellationToken::new();

    let outcome = listener.listen(DEADLINE, &token).await.unwrap();
    assert_eq!(outcome.kind, ConfirmationKind::Timeout);

    // The abandoned capture must not leave the device open.
    assert!(
        !capture.is_recording(),
        "device must be released after an abandoned window"
    );
    assert!(
        capture.start().await.is_ok(),
        "a fresh capture should be able to open the device"
    );
    capture.abort().await;
}

#[tokio::test(start_paused = true)]
async fn test_second_listen_fails_without_disturbing_first() {
    let (listener, _) = listener_with(vec![ScriptedReply::Text("yes", 0.9)]);
    let token = CancellationToken::new();

    let first = {
        let listener = Arc::clone(&listener);
        let token = token.clone();
        tokio::spawn(async move { listener.listen(DEADLINE, &token).await })
    };

    // Let the first window open its capture.
    tokio::task::yield_now().await;
    assert!(listener.is_listening());

    let second = listener.listen(DEADLINE, &token).await;
    assert!(
        matches!(second, Err(VoiceError::AlreadyListening)),
        "second concurrent listen must fail with already-listening"
    );

    let first = first.await.unwrap().expect("first window should resolve");
    assert_eq!(first.kind, ConfirmationKind::Confirm);
}

#[tokio::test(start_paused = true)]
async fn test_transcription_failure_propagates_as_error() {
    let (listener, _) = listener_with(vec![ScriptedReply::Fail]);
    let token = CancellationToken::new();

    let result = listener.listen(DEADLINE, &token).await;
    assert!(
        matches!(result, Err(VoiceError::Transcription(_))),
        "failures are rejections, distinct from Timeout/Unclear"
    );
    assert!(!listener.is_listening());
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_preempts_window() {
    let capture = test_capture();
    let transcription = ScriptedTranscription::new(vec![ScriptedReply::Hang]);
    let listener = Arc::new(ConfirmationListener::new(
        Arc::clone(&capture),
        transcription,
        DWELL,
    ));

    let token = CancellationToken::new();
    let handle = {
        let listener = Arc::clone(&listener);
        let token = token.clone();
        tokio::spawn(async move { listener.listen(DEADLINE, &token).await })
    };

    tokio::task::yield_now().await;
    token.cancel();

    let result = handle.await.unwrap();
    assert!(matches!(result, Err(VoiceError::Cancelled)));
    assert!(!capture.is_recording(), "pre-empted window must release the device");
}

#[tokio::test(start_paused = true)]
async fn test_silent_window_is_unclear() {
    // Empty low-confidence transcript (silent buffer contract).
    let (listener, _) = listener_with(vec![ScriptedReply::Text("", 0.0)]);
    let token = CancellationToken::new();

    let outcome = listener.listen(DEADLINE, &token).await.unwrap();
    assert_eq!(outcome.kind, ConfirmationKind::Unclear);
    assert_eq!(outcome.confidence, 0.0);
}
