//! Presentation model for the playback widget.

use std::fmt;

use maestro_core::{Command, PlaybackMode, PlaybackState, PlaybackStatus};
use serde::Serialize;

/// Manual controls shown by the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    Play,
    Pause,
    Next,
    Prev,
    VolumeUp,
    VolumeDown,
    Like,
    Dislike,
}

impl Button {
    pub const ALL: [Self; 8] = [
        Self::Play,
        Self::Pause,
        Self::Next,
        Self::Prev,
        Self::VolumeUp,
        Self::VolumeDown,
        Self::Like,
        Self::Dislike,
    ];

    pub const fn command(self) -> Command {
        match self {
            Self::Play => Command::Play,
            Self::Pause => Command::Pause,
            Self::Next => Command::Next,
            Self::Prev => Command::Prev,
            Self::VolumeUp => Command::VolumeUp,
            Self::VolumeDown => Command::VolumeDown,
            Self::Like => Command::Like,
            Self::Dislike => Command::Dislike,
        }
    }

    /// Parse a button label (`"play"`, `"volume_up"`, ...).
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|button| button.command().to_string() == label)
    }
}

/// One row of the song list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SongRow {
    pub index: usize,
    pub title: String,
    pub current: bool,
}

/// Everything the widget displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NowPlaying {
    pub title: Option<String>,
    pub mode: PlaybackMode,
    pub status: PlaybackStatus,
    pub likes: u64,
    pub dislikes: u64,
    pub volume: Option<u8>,
    pub gesture_active: bool,
    pub voice_listening: bool,
    pub songs: Vec<SongRow>,
}

impl From<&PlaybackState> for NowPlaying {
    fn from(state: &PlaybackState) -> Self {
        let songs = state
            .songs
            .iter()
            .enumerate()
            .map(|(index, title)| SongRow {
                index,
                title: title.clone(),
                current: index == state.current_index,
            })
            .collect();

        Self {
            title: state.current_song().map(str::to_string),
            mode: state.mode,
            status: state.status,
            likes: state.likes,
            dislikes: state.dislikes,
            volume: state.volume,
            gesture_active: state.gesture_active,
            voice_listening: state.voice_listening,
            songs,
        }
    }
}

impl fmt::Display for NowPlaying {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.title {
            Some(title) => writeln!(f, "Now playing: {title} [{}]", self.status)?,
            None => writeln!(f, "No songs available [{}]", self.status)?,
        }
        write!(f, "mode {}  likes {}  dislikes {}", self.mode, self.likes, self.dislikes)?;
        match self.volume {
            Some(volume) => write!(f, "  volume {volume}")?,
            None => write!(f, "  volume ?")?,
        }
        writeln!(
            f,
            "  gesture {}  voice {}",
            on_off(self.gesture_active),
            on_off(self.voice_listening)
        )?;
        for row in &self.songs {
            let marker = if row.current { '>' } else { ' ' };
            writeln!(f, "{marker} {:>3}  {}", row.index, row.title)?;
        }
        Ok(())
    }
}

const fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_labels() {
        assert_eq!(Button::from_label("volume_up"), Some(Button::VolumeUp));
        assert_eq!(Button::from_label(" Like "), Some(Button::Like));
        assert_eq!(Button::from_label("louder"), None);
    }

    #[test]
    fn test_now_playing_marks_current_song() {
        let state = PlaybackState {
            songs: vec!["a.mp3".into(), "b.mp3".into()],
            current_index: 1,
            likes: 3,
            ..Default::default()
        };
        let view = NowPlaying::from(&state);
        assert_eq!(view.title.as_deref(), Some("b.mp3"));
        assert!(!view.songs[0].current);
        assert!(view.songs[1].current);

        let text = view.to_string();
        assert!(text.contains("Now playing: b.mp3 [stopped]"));
        assert!(text.contains(">   1  b.mp3"));
    }

    #[test]
    fn test_now_playing_serializes_camel_case() {
        let view = NowPlaying::from(&PlaybackState::default());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["gestureActive"], false);
        assert_eq!(json["mode"], "local");
        assert!(json["title"].is_null());
    }
}
