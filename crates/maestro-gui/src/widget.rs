//! The playback widget.
//!
//! Follows the store and keeps a [`MediaSurface`] pointed at the current
//! track. Manual controls become commands with `Origin::Manual`; the
//! surface's own play/pause controls bypass the dispatcher entirely, so the
//! surface and the store each keep their own idea of "playing".

use std::sync::Arc;

use maestro_core::{
    ClientConfig, Command, MediaSurface, Origin, PlaybackState, PlaybackStatus, StateStore,
};
use maestro_runtime::{CommandDispatcher, DispatchError, DispatchOutcome};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::view::{Button, NowPlaying};

type Pending = JoinHandle<Result<DispatchOutcome, DispatchError>>;

/// What the surface was last told to load.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Loaded {
    index: usize,
    url: String,
}

pub struct PlaybackWidget {
    media_base: String,
    store: Arc<StateStore>,
    dispatcher: Arc<CommandDispatcher>,
    surface: Arc<dyn MediaSurface>,
    loaded: Mutex<Option<Loaded>>,
}

impl PlaybackWidget {
    pub fn new(
        config: &ClientConfig,
        store: Arc<StateStore>,
        dispatcher: Arc<CommandDispatcher>,
        surface: Arc<dyn MediaSurface>,
    ) -> Self {
        Self {
            media_base: config.media_base(),
            store,
            dispatcher,
            surface,
            loaded: Mutex::new(None),
        }
    }

    /// Playable URL for the current track, if there is one.
    pub fn resource_url(&self, state: &PlaybackState) -> Option<String> {
        state
            .current_song()
            .map(|song| format!("{}/{}", self.media_base, urlencoding::encode(song)))
    }

    /// Bring the surface in line with `state`.
    ///
    /// Reloads when the current index or the track under it changed, then
    /// starts playback if the state says it is playing. Returns whether a
    /// reload happened.
    pub fn render(&self, state: &PlaybackState) -> bool {
        let Some(url) = self.resource_url(state) else {
            return false;
        };
        let next = Loaded {
            index: state.current_index,
            url,
        };

        let mut loaded = self.loaded.lock();
        if loaded.as_ref() == Some(&next) {
            return false;
        }

        debug!(index = next.index, url = %next.url, "Loading track");
        self.surface.load(&next.url);
        if state.status == PlaybackStatus::Playing {
            self.surface.play();
        }
        *loaded = Some(next);
        true
    }

    /// Follow store changes until `cancel` fires.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut changes = self.store.subscribe();
        let initial = changes.borrow_and_update().clone();
        self.render(&initial);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                changed = changes.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let state = changes.borrow_and_update().clone();
                    self.render(&state);
                }
            }
        }
        debug!("Playback widget stopped");
    }

    /// A manual control was pressed.
    pub fn press(&self, button: Button) -> Pending {
        self.dispatcher
            .fire(button.command().with_origin(Origin::Manual))
    }

    /// A song was picked from the list.
    pub fn select(&self, index: usize) -> Pending {
        self.dispatcher
            .fire(Command::PlayIndex(index).with_origin(Origin::Manual))
    }

    /// The surface's own play control. Does not touch the store.
    pub fn native_play(&self) {
        self.surface.play();
    }

    /// The surface's own pause control. Does not touch the store.
    pub fn native_pause(&self) {
        self.surface.pause();
    }

    pub fn now_playing(&self) -> NowPlaying {
        NowPlaying::from(&self.store.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maestro_core::StatePatch;
    use maestro_runtime::testing::FakePlayerApi;

    #[derive(Default)]
    struct Surface {
        ops: Mutex<Vec<String>>,
        playing: Mutex<bool>,
        source: Mutex<Option<String>>,
    }

    impl MediaSurface for Surface {
        fn load(&self, url: &str) {
            self.ops.lock().push(format!("load {url}"));
            *self.source.lock() = Some(url.to_string());
            *self.playing.lock() = false;
        }

        fn play(&self) {
            self.ops.lock().push("play".into());
            *self.playing.lock() = true;
        }

        fn pause(&self) {
            self.ops.lock().push("pause".into());
            *self.playing.lock() = false;
        }

        fn is_playing(&self) -> bool {
            *self.playing.lock()
        }

        fn source(&self) -> Option<String> {
            self.source.lock().clone()
        }
    }

    fn widget(songs: &[&str]) -> (PlaybackWidget, Arc<Surface>, Arc<StateStore>) {
        let api = Arc::new(FakePlayerApi::with_songs(songs));
        let store = Arc::new(StateStore::new());
        store.apply(StatePatch {
            songs: Some(songs.iter().map(ToString::to_string).collect()),
            ..StatePatch::default()
        });
        let dispatcher = Arc::new(CommandDispatcher::new(api, store.clone()));
        let surface = Arc::new(Surface::default());
        let widget = PlaybackWidget::new(
            &ClientConfig::new(),
            store.clone(),
            dispatcher,
            surface.clone(),
        );
        (widget, surface, store)
    }

    #[test]
    fn test_resource_url_is_percent_encoded() {
        let (widget, _, store) = widget(&["My Song #1.mp3"]);
        assert_eq!(
            widget.resource_url(&store.snapshot()).as_deref(),
            Some("http://localhost:5000/music/My%20Song%20%231.mp3")
        );
    }

    #[test]
    fn test_render_loads_once_per_track() {
        let (widget, surface, store) = widget(&["a.mp3", "b.mp3"]);
        assert!(widget.render(&store.snapshot()));
        assert!(!widget.render(&store.snapshot()));
        assert_eq!(surface.ops.lock().len(), 1);
    }

    #[test]
    fn test_render_without_songs_does_nothing() {
        let (widget, surface, store) = widget(&[]);
        assert!(!widget.render(&store.snapshot()));
        assert!(surface.source().is_none());
    }

    #[test]
    fn test_autoplay_only_when_playing() {
        let (widget, surface, store) = widget(&["a.mp3", "b.mp3"]);
        widget.render(&store.snapshot());
        assert!(!surface.is_playing());

        store.apply(StatePatch {
            current_index: Some(1),
            status: Some(PlaybackStatus::Playing),
            ..StatePatch::default()
        });
        widget.render(&store.snapshot());
        assert!(surface.is_playing());
        assert_eq!(
            surface.source().as_deref(),
            Some("http://localhost:5000/music/b.mp3")
        );
    }

    #[test]
    fn test_native_controls_bypass_store() {
        let (widget, surface, store) = widget(&["a.mp3"]);
        widget.render(&store.snapshot());

        widget.native_play();
        assert!(surface.is_playing());
        assert_eq!(store.snapshot().status, PlaybackStatus::Stopped);

        widget.native_pause();
        assert!(!surface.is_playing());
    }
}
