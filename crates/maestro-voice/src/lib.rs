//! Voice control for maestro.
//!
//! [`VoiceCommandAdapter`] holds a continuous speech recognition session
//! open and turns spoken keywords ("play", "pause", "next", "previous")
//! into playback commands. The recognizer itself is injected through the
//! core [`SpeechRecognizer`](maestro_core::SpeechRecognizer) port.

#![deny(unused_crate_dependencies)]

pub mod adapter;
pub mod error;
pub mod keywords;

// Re-export key types for convenience
pub use adapter::{VoiceCommandAdapter, VoiceState};
pub use error::VoiceError;
pub use keywords::{KEYWORDS, match_transcript};

// Silence unused dev-dependency warnings
#[cfg(test)]
use mockall as _;
#[cfg(test)]
use tokio_test as _;
