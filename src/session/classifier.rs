//! Free-form confirmation speech classification.
//!
//! Substring matching against fixed phrase sets, not tokenization: a
//! transcript containing "wait" anywhere classifies as Cancel even
//! mid-sentence. The confirm set is checked before the cancel set, so a
//! transcript matching both resolves to Confirm. Both behaviors are
//! intentional and covered by tests; see the latent false-positive note on
//! [`classify`].

/// Positive confirmation phrases, checked first.
const CONFIRM_PHRASES: &[&str] = &[
    "yes",
    "yeah",
    "yep",
    "sure",
    "okay",
    "ok",
    "go ahead",
    "do it",
    "proceed",
    "confirm",
    "correct",
    "right",
    "absolutely",
    "definitely",
    "send it",
    "create it",
];

/// Negative confirmation phrases.
const CANCEL_PHRASES: &[&str] = &[
    "no",
    "nope",
    "cancel",
    "stop",
    "abort",
    "never mind",
    "nevermind",
    "don't",
    "wait",
    "hold on",
    "incorrect",
    "wrong",
    "not right",
    "negative",
];

/// How one confirmation listening window resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationKind {
    Confirm,
    Cancel,
    Unclear,
    Timeout,
}

/// Outcome of one confirmation listening window. Produced once, consumed
/// immediately by the session controller, then discarded.
#[derive(Debug, Clone)]
pub struct ConfirmationOutcome {
    pub kind: ConfirmationKind,
    pub confidence: f64,
    pub raw_text: String,
}

impl ConfirmationOutcome {
    /// The fixed outcome for a window whose deadline elapsed.
    pub fn timeout() -> Self {
        Self {
            kind: ConfirmationKind::Timeout,
            confidence: 0.0,
            raw_text: "timeout".to_string(),
        }
    }
}

/// Classify a confirmation transcript.
///
/// Total and deterministic: every input maps to Confirm, Cancel, or
/// Unclear. A matched phrase emits the transcription confidence scaled by
/// 0.9; spoken confirmations are never trusted at full transcription
/// confidence. No match yields Unclear with confidence 0.
///
/// Known latent false positive: substring matching over whole sentences
/// means "okay, wait" resolves to Confirm (the confirm set is scanned
/// first and matches "okay") while "wait, that's wrong... fine" resolves
/// to Cancel. Preserved deliberately; callers should not tokenize around
/// it.
pub fn classify(text: &str, confidence: f64) -> ConfirmationOutcome {
    let normalized = text.to_lowercase().trim().to_string();

    for phrase in CONFIRM_PHRASES {
        if normalized.contains(phrase) {
            return ConfirmationOutcome {
                kind: ConfirmationKind::Confirm,
                confidence: confidence * 0.9,
                raw_text: normalized,
            };
        }
    }

    for phrase in CANCEL_PHRASES {
        if normalized.contains(phrase) {
            return ConfirmationOutcome {
                kind: ConfirmationKind::Cancel,
                confidence: confidence * 0.9,
                raw_text: normalized,
            };
        }
    }

    ConfirmationOutcome {
        kind: ConfirmationKind::Unclear,
        confidence: 0.0,
        raw_text: normalized,
    }
}
