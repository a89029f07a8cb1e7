//! Voice control error types.

use maestro_core::SpeechError;

/// Errors returned by [`VoiceCommandAdapter`](crate::VoiceCommandAdapter).
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    /// Voice control is already listening.
    #[error("Voice control is already active")]
    AlreadyActive,

    /// Voice control is not listening.
    #[error("Voice control is not active")]
    NotActive,

    /// The recognizer could not open a session.
    #[error("Could not start speech recognition: {0}")]
    Recognizer(#[from] SpeechError),
}
