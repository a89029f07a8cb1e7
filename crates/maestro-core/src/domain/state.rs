//! Playback state and the partial patches that mutate it.
//!
//! `PlaybackState` is the client's belief about the remote player. It is
//! never mutated field-by-field from outside the store: every write is a
//! [`StatePatch`] merged by [`StateStore::apply`](crate::store::StateStore::apply),
//! which is also where the index invariant is enforced.

use serde::{Deserialize, Serialize};

/// Volume step used by the backend player for volume up/down.
pub const VOLUME_STEP: u8 = 10;

/// Upper bound of the backend volume scale.
pub const MAX_VOLUME: u8 = 100;

// ── Enumerations ───────────────────────────────────────────────────

/// Which track source `current_index` indexes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackMode {
    /// Tracks served from the backend's local music folder.
    #[default]
    Local,
    /// Tracks from a remote streaming source.
    Remote,
}

impl PlaybackMode {
    /// Wire label (`"local"` / `"remote"`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

impl std::fmt::Display for PlaybackMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport status reported by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    Playing,
    Paused,
    #[default]
    Stopped,
}

impl PlaybackStatus {
    /// Wire label (`"playing"`, `"paused"`, `"stopped"`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Fields ─────────────────────────────────────────────────────────

/// Names one field of [`PlaybackState`].
///
/// Used for per-field write revisions in the store and per-field command
/// sequencing in the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Mode,
    Status,
    CurrentIndex,
    Songs,
    Likes,
    Dislikes,
    Volume,
    GestureActive,
    VoiceListening,
}

impl Field {
    /// Every field, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Mode,
        Self::Status,
        Self::CurrentIndex,
        Self::Songs,
        Self::Likes,
        Self::Dislikes,
        Self::Volume,
        Self::GestureActive,
        Self::VoiceListening,
    ];

    /// Number of fields.
    pub const COUNT: usize = Self::ALL.len();

    /// Dense index for per-field tables.
    pub const fn index(self) -> usize {
        self as usize
    }
}

// ── Playback state ─────────────────────────────────────────────────

/// The client's view of the remote player.
///
/// Invariant: when `songs` is non-empty, `current_index < songs.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub mode: PlaybackMode,
    pub status: PlaybackStatus,
    pub current_index: usize,
    /// Ordered track identifiers (file names for the local source).
    pub songs: Vec<String>,
    pub likes: u64,
    pub dislikes: u64,
    /// Backend volume (0-100); unknown until the backend reports it.
    pub volume: Option<u8>,
    pub gesture_active: bool,
    pub voice_listening: bool,
}

impl PlaybackState {
    /// Track identifier at `current_index`, if the list is loaded.
    pub fn current_song(&self) -> Option<&str> {
        self.songs.get(self.current_index).map(String::as_str)
    }

    /// Index after the current one, wrapping at the end of the list.
    pub fn next_index(&self) -> Option<usize> {
        let len = self.songs.len();
        (len > 0).then(|| (self.current_index + 1) % len)
    }

    /// Index before the current one, wrapping at the start of the list.
    pub fn prev_index(&self) -> Option<usize> {
        let len = self.songs.len();
        (len > 0).then(|| (self.current_index % len + len - 1) % len)
    }

    /// Whether `index` addresses a loaded track.
    ///
    /// With no songs loaded every index is accepted; the list may simply
    /// not have arrived yet.
    pub fn accepts_index(&self, index: usize) -> bool {
        self.songs.is_empty() || index < self.songs.len()
    }

    /// Pull `current_index` back into bounds. Returns `true` if it moved.
    pub(crate) fn clamp_index(&mut self) -> bool {
        let len = self.songs.len();
        if len > 0 && self.current_index >= len {
            self.current_index = len - 1;
            return true;
        }
        false
    }
}

// ── Patches ────────────────────────────────────────────────────────

/// A partial playback state. `None` fields are left untouched on merge.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatePatch {
    pub mode: Option<PlaybackMode>,
    pub status: Option<PlaybackStatus>,
    pub current_index: Option<usize>,
    pub songs: Option<Vec<String>>,
    pub likes: Option<u64>,
    pub dislikes: Option<u64>,
    pub volume: Option<u8>,
    pub gesture_active: Option<bool>,
    pub voice_listening: Option<bool>,
}

impl StatePatch {
    /// An empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the patch names no field at all.
    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    /// Whether the patch names `field`.
    pub const fn touches(&self, field: Field) -> bool {
        match field {
            Field::Mode => self.mode.is_some(),
            Field::Status => self.status.is_some(),
            Field::CurrentIndex => self.current_index.is_some(),
            Field::Songs => self.songs.is_some(),
            Field::Likes => self.likes.is_some(),
            Field::Dislikes => self.dislikes.is_some(),
            Field::Volume => self.volume.is_some(),
            Field::GestureActive => self.gesture_active.is_some(),
            Field::VoiceListening => self.voice_listening.is_some(),
        }
    }

    /// Fields named by this patch, in declaration order.
    pub fn fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| self.touches(*field))
            .collect()
    }

    /// Drop every field for which `keep` returns `false`.
    #[must_use]
    pub fn retain(mut self, mut keep: impl FnMut(Field) -> bool) -> Self {
        for field in Field::ALL {
            if self.touches(field) && !keep(field) {
                self.clear(field);
            }
        }
        self
    }

    /// Copy the current values of `fields` out of `state`.
    ///
    /// The result undoes a later patch that touched the same fields.
    pub fn capture(state: &PlaybackState, fields: &[Field]) -> Self {
        let mut patch = Self::default();
        for field in fields {
            match field {
                Field::Mode => patch.mode = Some(state.mode),
                Field::Status => patch.status = Some(state.status),
                Field::CurrentIndex => patch.current_index = Some(state.current_index),
                Field::Songs => patch.songs = Some(state.songs.clone()),
                Field::Likes => patch.likes = Some(state.likes),
                Field::Dislikes => patch.dislikes = Some(state.dislikes),
                // Unknown volume has no patch representation; nothing to restore.
                Field::Volume => patch.volume = state.volume,
                Field::GestureActive => patch.gesture_active = Some(state.gesture_active),
                Field::VoiceListening => patch.voice_listening = Some(state.voice_listening),
            }
        }
        patch
    }

    fn clear(&mut self, field: Field) {
        match field {
            Field::Mode => self.mode = None,
            Field::Status => self.status = None,
            Field::CurrentIndex => self.current_index = None,
            Field::Songs => self.songs = None,
            Field::Likes => self.likes = None,
            Field::Dislikes => self.dislikes = None,
            Field::Volume => self.volume = None,
            Field::GestureActive => self.gesture_active = None,
            Field::VoiceListening => self.voice_listening = None,
        }
    }

    /// Merge into `state`, last writer wins per field.
    ///
    /// Returns `true` if any value changed. Does not clamp; the store does.
    pub(crate) fn merge_into(&self, state: &mut PlaybackState) -> bool {
        fn set<T: PartialEq + Clone>(slot: &mut T, value: Option<&T>) -> bool {
            match value {
                Some(v) if slot != v => {
                    *slot = v.clone();
                    true
                }
                _ => false,
            }
        }

        let mut changed = false;
        changed |= set(&mut state.mode, self.mode.as_ref());
        changed |= set(&mut state.status, self.status.as_ref());
        changed |= set(&mut state.current_index, self.current_index.as_ref());
        changed |= set(&mut state.songs, self.songs.as_ref());
        changed |= set(&mut state.likes, self.likes.as_ref());
        changed |= set(&mut state.dislikes, self.dislikes.as_ref());
        if let Some(volume) = self.volume {
            if state.volume != Some(volume) {
                state.volume = Some(volume);
                changed = true;
            }
        }
        changed |= set(&mut state.gesture_active, self.gesture_active.as_ref());
        changed |= set(&mut state.voice_listening, self.voice_listening.as_ref());
        changed
    }
}
