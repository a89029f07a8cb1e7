//! Test doubles for the runtime.
//!
//! [`FakePlayerApi`] simulates the playback backend in memory: it keeps a
//! small server model (songs, index, status, volume, counters, gesture flag)
//! and answers each endpoint the way the real service does. Individual calls
//! can be made to fail, be held back until released, or never complete.
//!
//! Only compiled for tests or with the `test-utils` feature.

use async_trait::async_trait;
use maestro_core::{
    CommandAck, PlaybackMode, PlaybackStatus, PlayerAction, PlayerApi, PlayerPortError,
    PlayerPortResult, ServerState,
};
use parking_lot::Mutex;
use tokio::sync::oneshot;

/// One endpoint of the backend, for scripting and call inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    State,
    Songs,
    Action(PlayerAction),
    PlayIndex,
    Gesture(bool),
}

enum Override {
    Fail(PlayerPortError),
    Defer(oneshot::Receiver<()>),
}

#[derive(Debug, Clone)]
struct ServerModel {
    songs: Vec<String>,
    index: usize,
    status: PlaybackStatus,
    mode: PlaybackMode,
    volume: u8,
    likes: u64,
    dislikes: u64,
    gesture: bool,
}

impl ServerModel {
    fn state(&self, report_gesture: bool) -> ServerState {
        ServerState {
            current_index: Some(self.index),
            status: Some(self.status),
            mode: Some(self.mode),
            likes: Some(self.likes),
            dislikes: Some(self.dislikes),
            gesture: report_gesture.then_some(self.gesture),
        }
    }

    fn act(&mut self, action: PlayerAction) -> CommandAck {
        let n = self.songs.len();
        match action {
            PlayerAction::Play => {
                self.status = PlaybackStatus::Playing;
                CommandAck {
                    status: Some(self.status),
                    ..CommandAck::default()
                }
            }
            PlayerAction::Pause => {
                self.status = PlaybackStatus::Paused;
                CommandAck {
                    status: Some(self.status),
                    ..CommandAck::default()
                }
            }
            PlayerAction::Next | PlayerAction::Prev => {
                if n > 0 {
                    self.index = if action == PlayerAction::Next {
                        (self.index + 1) % n
                    } else {
                        (self.index + n - 1) % n
                    };
                }
                CommandAck {
                    current_index: Some(self.index),
                    ..CommandAck::default()
                }
            }
            PlayerAction::VolumeUp | PlayerAction::VolumeDown => {
                self.volume = if action == PlayerAction::VolumeUp {
                    self.volume.saturating_add(10).min(100)
                } else {
                    self.volume.saturating_sub(10)
                };
                CommandAck {
                    volume: Some(self.volume),
                    ..CommandAck::default()
                }
            }
            PlayerAction::Like => {
                self.likes += 1;
                CommandAck {
                    likes: Some(self.likes),
                    ..CommandAck::default()
                }
            }
            PlayerAction::Dislike => {
                self.dislikes += 1;
                CommandAck {
                    dislikes: Some(self.dislikes),
                    ..CommandAck::default()
                }
            }
        }
    }

    fn play_index(&mut self, index: usize) -> PlayerPortResult<CommandAck> {
        if index >= self.songs.len() {
            return Err(PlayerPortError::Rejected {
                status: 400,
                message: "Invalid index".to_string(),
            });
        }
        self.index = index;
        self.status = PlaybackStatus::Playing;
        Ok(CommandAck {
            status: Some(self.status),
            current_index: Some(self.index),
            ..CommandAck::default()
        })
    }
}

struct Inner {
    server: ServerModel,
    overrides: Vec<(Endpoint, Override)>,
    calls: Vec<Endpoint>,
    offline: bool,
    report_gesture: bool,
    hang_gesture: bool,
}

impl Inner {
    fn take_override(&mut self, endpoint: Endpoint) -> Option<Override> {
        let pos = self.overrides.iter().position(|(e, _)| *e == endpoint)?;
        Some(self.overrides.remove(pos).1)
    }
}

/// In-memory stand-in for the playback backend.
pub struct FakePlayerApi {
    inner: Mutex<Inner>,
}

impl Default for FakePlayerApi {
    fn default() -> Self {
        Self::with_songs(&[])
    }
}

impl FakePlayerApi {
    /// A backend serving `songs`, stopped at index 0 with volume 50.
    pub fn with_songs(songs: &[&str]) -> Self {
        Self {
            inner: Mutex::new(Inner {
                server: ServerModel {
                    songs: songs.iter().map(ToString::to_string).collect(),
                    index: 0,
                    status: PlaybackStatus::Stopped,
                    mode: PlaybackMode::Local,
                    volume: 50,
                    likes: 0,
                    dislikes: 0,
                    gesture: false,
                },
                overrides: Vec::new(),
                calls: Vec::new(),
                offline: false,
                report_gesture: true,
                hang_gesture: false,
            }),
        }
    }

    /// Fail the next call to `endpoint` with `error`.
    pub fn fail_next(&self, endpoint: Endpoint, error: PlayerPortError) {
        self.inner
            .lock()
            .overrides
            .push((endpoint, Override::Fail(error)));
    }

    /// Hold the next response from `endpoint` until the sender fires (or is
    /// dropped). The server model is updated when the call arrives.
    pub fn defer_next(&self, endpoint: Endpoint) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.inner
            .lock()
            .overrides
            .push((endpoint, Override::Defer(rx)));
        tx
    }

    /// Every call fails with a network error while offline.
    pub fn set_offline(&self, offline: bool) {
        self.inner.lock().offline = offline;
    }

    /// Leave `gesture` out of state payloads.
    pub fn omit_gesture(&self, omit: bool) {
        self.inner.lock().report_gesture = !omit;
    }

    /// Gesture requests never complete.
    pub fn hang_gesture(&self, hang: bool) {
        self.inner.lock().hang_gesture = hang;
    }

    pub fn set_server_index(&self, index: usize) {
        self.inner.lock().server.index = index;
    }

    pub fn set_server_status(&self, status: PlaybackStatus) {
        self.inner.lock().server.status = status;
    }

    pub fn set_server_mode(&self, mode: PlaybackMode) {
        self.inner.lock().server.mode = mode;
    }

    pub fn set_server_gesture(&self, active: bool) {
        self.inner.lock().server.gesture = active;
    }

    pub fn set_songs(&self, songs: &[&str]) {
        self.inner.lock().server.songs = songs.iter().map(ToString::to_string).collect();
    }

    /// What `GET /api/state` would currently return.
    pub fn server_state(&self) -> ServerState {
        let inner = self.inner.lock();
        inner.server.state(inner.report_gesture)
    }

    /// Every call received so far, in arrival order.
    pub fn calls(&self) -> Vec<Endpoint> {
        self.inner.lock().calls.clone()
    }

    pub fn count(&self, endpoint: Endpoint) -> usize {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|e| **e == endpoint)
            .count()
    }

    async fn call<T>(
        &self,
        endpoint: Endpoint,
        respond: impl FnOnce(&mut Inner) -> PlayerPortResult<T> + Send,
    ) -> PlayerPortResult<T> {
        let (result, release) = {
            let mut inner = self.inner.lock();
            inner.calls.push(endpoint);
            if inner.offline {
                (
                    Err(PlayerPortError::Network {
                        message: "backend offline".to_string(),
                    }),
                    None,
                )
            } else {
                match inner.take_override(endpoint) {
                    Some(Override::Fail(e)) => (Err(e), None),
                    Some(Override::Defer(rx)) => (respond(&mut inner), Some(rx)),
                    None => (respond(&mut inner), None),
                }
            }
        };

        if let Some(rx) = release {
            // A dropped sender releases the response as well.
            rx.await.ok();
        }
        result
    }
}

#[async_trait]
impl PlayerApi for FakePlayerApi {
    async fn fetch_state(&self) -> PlayerPortResult<ServerState> {
        self.call(Endpoint::State, |inner| {
            Ok(inner.server.state(inner.report_gesture))
        })
        .await
    }

    async fn fetch_songs(&self) -> PlayerPortResult<Vec<String>> {
        self.call(Endpoint::Songs, |inner| Ok(inner.server.songs.clone()))
            .await
    }

    async fn send_action(&self, action: PlayerAction) -> PlayerPortResult<CommandAck> {
        self.call(Endpoint::Action(action), |inner| Ok(inner.server.act(action)))
            .await
    }

    async fn play_index(&self, index: usize) -> PlayerPortResult<CommandAck> {
        self.call(Endpoint::PlayIndex, |inner| inner.server.play_index(index))
            .await
    }

    async fn set_gesture(&self, active: bool) -> PlayerPortResult<()> {
        let hang = self.inner.lock().hang_gesture;
        if hang {
            self.inner.lock().calls.push(Endpoint::Gesture(active));
            std::future::pending::<()>().await;
        }
        self.call(Endpoint::Gesture(active), |inner| {
            inner.server.gesture = active;
            Ok(())
        })
        .await
    }
}
