//! Commands produced by the manual, voice and gesture control surfaces.

use serde::{Deserialize, Serialize};

use super::state::{Field, MAX_VOLUME, PlaybackState, PlaybackStatus, StatePatch, VOLUME_STEP};

/// Which input channel produced a command.
///
/// Carried for observability only; it never influences arbitration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Manual,
    Voice,
    Gesture,
}

/// A request to change playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Play,
    Pause,
    Next,
    Prev,
    VolumeUp,
    VolumeDown,
    Like,
    Dislike,
    PlayIndex(usize),
    GestureStart,
    GestureStop,
    VoiceStart,
    VoiceStop,
}

/// Backend actions reachable through the plain `POST /api/<action>` endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerAction {
    Play,
    Pause,
    Next,
    Prev,
    VolumeUp,
    VolumeDown,
    Like,
    Dislike,
}

impl PlayerAction {
    /// Endpoint path relative to the API base.
    pub const fn path(self) -> &'static str {
        match self {
            Self::Play => "/api/play",
            Self::Pause => "/api/pause",
            Self::Next => "/api/next",
            Self::Prev => "/api/prev",
            Self::VolumeUp => "/api/volume_up",
            Self::VolumeDown => "/api/volume_down",
            Self::Like => "/api/like",
            Self::Dislike => "/api/dislike",
        }
    }
}

impl Command {
    /// Tag this command with the channel it came from.
    pub const fn with_origin(self, origin: Origin) -> TaggedCommand {
        TaggedCommand {
            command: self,
            origin,
        }
    }

    /// Fields this command may write, optimistically or from its response.
    pub const fn claims(self) -> &'static [Field] {
        match self {
            Self::Play | Self::Pause => &[Field::Status],
            Self::Next | Self::Prev => &[Field::CurrentIndex],
            Self::PlayIndex(_) => &[Field::CurrentIndex, Field::Status],
            Self::VolumeUp | Self::VolumeDown => &[Field::Volume],
            Self::Like => &[Field::Likes],
            Self::Dislike => &[Field::Dislikes],
            Self::GestureStart | Self::GestureStop => &[Field::GestureActive],
            Self::VoiceStart | Self::VoiceStop => &[Field::VoiceListening],
        }
    }

    /// The plain backend action behind this command, if it has one.
    pub const fn action(self) -> Option<PlayerAction> {
        match self {
            Self::Play => Some(PlayerAction::Play),
            Self::Pause => Some(PlayerAction::Pause),
            Self::Next => Some(PlayerAction::Next),
            Self::Prev => Some(PlayerAction::Prev),
            Self::VolumeUp => Some(PlayerAction::VolumeUp),
            Self::VolumeDown => Some(PlayerAction::VolumeDown),
            Self::Like => Some(PlayerAction::Like),
            Self::Dislike => Some(PlayerAction::Dislike),
            Self::PlayIndex(_)
            | Self::GestureStart
            | Self::GestureStop
            | Self::VoiceStart
            | Self::VoiceStop => None,
        }
    }

    /// Voice listening is client-side state; no request is issued.
    pub const fn is_local(self) -> bool {
        matches!(self, Self::VoiceStart | Self::VoiceStop)
    }

    /// Gesture toggles never inspect their acknowledgement.
    pub const fn is_fire_and_forget(self) -> bool {
        matches!(self, Self::GestureStart | Self::GestureStop)
    }

    /// The locally predictable effect of this command on `state`.
    ///
    /// Empty when nothing can be predicted (e.g. `Next` before the song
    /// list is known, or a volume step while the volume is unknown).
    pub fn optimistic_patch(self, state: &PlaybackState) -> StatePatch {
        let mut patch = StatePatch::default();
        match self {
            Self::Play => patch.status = Some(PlaybackStatus::Playing),
            Self::Pause => patch.status = Some(PlaybackStatus::Paused),
            Self::Next => patch.current_index = state.next_index(),
            Self::Prev => patch.current_index = state.prev_index(),
            Self::PlayIndex(index) => {
                if state.accepts_index(index) {
                    patch.current_index = Some(index);
                    patch.status = Some(PlaybackStatus::Playing);
                }
            }
            Self::VolumeUp => {
                patch.volume = state
                    .volume
                    .map(|v| v.saturating_add(VOLUME_STEP).min(MAX_VOLUME));
            }
            Self::VolumeDown => patch.volume = state.volume.map(|v| v.saturating_sub(VOLUME_STEP)),
            Self::Like => patch.likes = Some(state.likes.saturating_add(1)),
            Self::Dislike => patch.dislikes = Some(state.dislikes.saturating_add(1)),
            Self::GestureStart => patch.gesture_active = Some(true),
            Self::GestureStop => patch.gesture_active = Some(false),
            Self::VoiceStart => patch.voice_listening = Some(true),
            Self::VoiceStop => patch.voice_listening = Some(false),
        }
        patch
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Play => f.write_str("play"),
            Self::Pause => f.write_str("pause"),
            Self::Next => f.write_str("next"),
            Self::Prev => f.write_str("prev"),
            Self::VolumeUp => f.write_str("volume_up"),
            Self::VolumeDown => f.write_str("volume_down"),
            Self::Like => f.write_str("like"),
            Self::Dislike => f.write_str("dislike"),
            Self::PlayIndex(index) => write!(f, "play_index({index})"),
            Self::GestureStart => f.write_str("gesture_start"),
            Self::GestureStop => f.write_str("gesture_stop"),
            Self::VoiceStart => f.write_str("voice_start"),
            Self::VoiceStop => f.write_str("voice_stop"),
        }
    }
}

/// A command together with the channel that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaggedCommand {
    pub command: Command,
    pub origin: Origin,
}
