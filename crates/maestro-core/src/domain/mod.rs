//! Domain types for playback state and commands.

mod command;
mod state;

pub use command::{Command, Origin, PlayerAction, TaggedCommand};
pub use state::{
    Field, MAX_VOLUME, PlaybackMode, PlaybackState, PlaybackStatus, StatePatch, VOLUME_STEP,
};
