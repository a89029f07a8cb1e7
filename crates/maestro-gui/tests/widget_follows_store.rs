//! Integration tests for `PlaybackWidget::run` against a live dispatcher.

use std::sync::Arc;

use maestro_core::{ClientConfig, MediaSurface, PlaybackStatus, StatePatch, StateStore};
use maestro_gui::{Button, PlaybackWidget};
use maestro_runtime::CommandDispatcher;
use maestro_runtime::testing::{Endpoint, FakePlayerApi};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

#[derive(Default)]
struct RecordingSurface {
    loads: Mutex<Vec<String>>,
    playing: Mutex<bool>,
}

impl MediaSurface for RecordingSurface {
    fn load(&self, url: &str) {
        self.loads.lock().push(url.to_string());
        *self.playing.lock() = false;
    }

    fn play(&self) {
        *self.playing.lock() = true;
    }

    fn pause(&self) {
        *self.playing.lock() = false;
    }

    fn is_playing(&self) -> bool {
        *self.playing.lock()
    }

    fn source(&self) -> Option<String> {
        self.loads.lock().last().cloned()
    }
}

struct Rig {
    api: Arc<FakePlayerApi>,
    store: Arc<StateStore>,
    surface: Arc<RecordingSurface>,
    widget: Arc<PlaybackWidget>,
}

fn rig() -> Rig {
    let songs = ["intro.mp3", "verse.mp3", "outro.mp3"];
    let api = Arc::new(FakePlayerApi::with_songs(&songs));
    let store = Arc::new(StateStore::new());
    store.apply(StatePatch {
        songs: Some(songs.iter().map(ToString::to_string).collect()),
        ..StatePatch::default()
    });
    let dispatcher = Arc::new(CommandDispatcher::new(api.clone(), store.clone()));
    let surface = Arc::new(RecordingSurface::default());
    let config = ClientConfig::new().with_base_url("http://player.local:5000");
    let widget = Arc::new(PlaybackWidget::new(
        &config,
        store.clone(),
        dispatcher,
        surface.clone(),
    ));
    Rig {
        api,
        store,
        surface,
        widget,
    }
}

async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_widget_follows_commands() {
    let rig = rig();
    let cancel = CancellationToken::new();
    let widget = rig.widget.clone();
    let token = cancel.clone();
    let task = tokio::spawn(async move { widget.run(token).await });
    settle().await;

    assert_eq!(
        rig.surface.source().as_deref(),
        Some("http://player.local:5000/music/intro.mp3")
    );

    rig.widget.press(Button::Next).await.unwrap().unwrap();
    settle().await;
    assert_eq!(
        rig.surface.source().as_deref(),
        Some("http://player.local:5000/music/verse.mp3")
    );
    assert!(!rig.surface.is_playing());

    rig.widget.select(2).await.unwrap().unwrap();
    settle().await;
    assert_eq!(
        rig.surface.source().as_deref(),
        Some("http://player.local:5000/music/outro.mp3")
    );
    assert!(rig.surface.is_playing());
    assert_eq!(rig.api.count(Endpoint::PlayIndex), 1);

    cancel.cancel();
    task.await.unwrap();

    // No longer following.
    rig.widget.select(0).await.unwrap().unwrap();
    settle().await;
    assert_eq!(rig.surface.loads.lock().len(), 3);
}

#[tokio::test]
async fn test_status_change_alone_does_not_reload() {
    let rig = rig();
    rig.widget.render(&rig.store.snapshot());

    rig.widget.press(Button::Play).await.unwrap().unwrap();
    assert!(!rig.widget.render(&rig.store.snapshot()));
    assert_eq!(rig.store.snapshot().status, PlaybackStatus::Playing);

    // The surface never heard about it; the two notions of playing diverge.
    assert!(!rig.surface.is_playing());
}

#[tokio::test]
async fn test_counters_show_in_view_model() {
    let rig = rig();
    rig.widget.press(Button::Like).await.unwrap().unwrap();
    rig.widget.press(Button::Like).await.unwrap().unwrap();
    rig.widget.press(Button::Dislike).await.unwrap().unwrap();
    rig.widget.press(Button::VolumeUp).await.unwrap().unwrap();

    let view = rig.widget.now_playing();
    assert_eq!((view.likes, view.dislikes), (2, 1));
    assert_eq!(view.volume, Some(60));
    assert_eq!(view.title.as_deref(), Some("intro.mp3"));
}
