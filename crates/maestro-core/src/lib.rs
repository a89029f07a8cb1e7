//! Core playback domain for maestro.
//!
//! Holds the pieces every other crate agrees on:
//!
//! - [`domain`]: playback state, patches and commands
//! - [`store`]: the single shared [`StateStore`]
//! - [`ports`]: traits for the backend, speech recognition and media output
//! - [`config`]: the explicit [`ClientConfig`] passed to each component

pub mod config;
pub mod domain;
pub mod ports;
pub mod store;

// Re-export commonly used types for convenience
pub use config::{ClientConfig, ConfigError};
pub use domain::{
    Command, Field, Origin, PlaybackMode, PlaybackState, PlaybackStatus, PlayerAction,
    StatePatch, TaggedCommand,
};
pub use ports::{
    CommandAck, MediaSurface, PlayerApi, PlayerPortError, PlayerPortResult, ServerState,
    SpeechError, SpeechEvent, SpeechRecognizer,
};
pub use store::{Applied, Revision, StateStore};

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;
