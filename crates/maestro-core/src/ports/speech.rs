//! Speech recognition capability.
//!
//! Replaces the host's ambient continuous-recognition global with an
//! injected trait so voice control runs without a microphone in tests.

use thiserror::Error;
use tokio::sync::mpsc;

/// Events produced by an open recognition session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// A transcript for the most recent utterance.
    Transcript {
        text: String,
        /// Whether the recognizer has finalized this result.
        is_final: bool,
    },

    /// The session failed and will produce nothing further.
    Error(String),

    /// The host closed the session.
    Ended,
}

/// Errors opening a recognition session.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SpeechError {
    #[error("Speech recognition is not available on this host")]
    Unavailable,

    #[error("Microphone permission denied")]
    PermissionDenied,

    #[error("Speech recognition failed: {0}")]
    Failed(String),
}

/// A continuous speech recognition engine.
pub trait SpeechRecognizer: Send + Sync {
    /// Open a continuous session for `language` (BCP 47 tag).
    ///
    /// Events arrive on the returned receiver until the session ends, fails
    /// or [`stop`](Self::stop) is called.
    fn start(&self, language: &str) -> Result<mpsc::UnboundedReceiver<SpeechEvent>, SpeechError>;

    /// Close the current session, if any.
    fn stop(&self);
}
