//! Port definitions for the collaborators the playback core consumes.
//!
//! Adapters implement these traits; the core never names a transport.

pub mod media;
pub mod player;
pub mod speech;

pub use media::MediaSurface;
pub use player::{
    CommandAck, PlayerApi, PlayerPortError, PlayerPortResult, ServerState,
};
pub use speech::{SpeechError, SpeechEvent, SpeechRecognizer};
