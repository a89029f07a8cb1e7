//! Periodic reconciliation against server truth.
//!
//! Each tick reads `GET /api/state` and overwrites every field the server
//! reported. Fields the payload omits are left alone. A failed poll is a
//! silent no-op (debug log only); the next tick tries again.
//!
//! The song list is fetched on the first tick and again whenever the polled
//! mode switches into [`PlaybackMode::Local`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use maestro_core::{
    ClientConfig, PlaybackMode, PlayerApi, PlayerPortResult, ServerState, StatePatch, StateStore,
};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Polls the backend and writes its answers into the store.
pub struct SyncLoop {
    api: Arc<dyn PlayerApi>,
    store: Arc<StateStore>,
    period: Duration,
    needs_songs: AtomicBool,
    cancel: CancellationToken,
    /// Held while applying a poll result and while cancelling.
    gate: Arc<Mutex<()>>,
}

impl SyncLoop {
    pub fn new(config: &ClientConfig, api: Arc<dyn PlayerApi>, store: Arc<StateStore>) -> Self {
        Self {
            api,
            store,
            period: config.poll_interval(),
            needs_songs: AtomicBool::new(true),
            cancel: CancellationToken::new(),
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// Poll once and apply the result.
    ///
    /// Refreshes the song list too when it is due. Song fetch failures are
    /// logged and retried on the next tick; only the state poll result is
    /// returned.
    pub async fn tick_once(&self) -> PlayerPortResult<ServerState> {
        let server = self.api.fetch_state().await?;

        let entered_local = {
            let _gate = self.gate.lock();
            if self.cancel.is_cancelled() {
                return Ok(server);
            }
            let previous = self.store.snapshot().mode;
            self.store.apply(server.to_patch());
            server.mode == Some(PlaybackMode::Local) && previous != PlaybackMode::Local
        };

        if entered_local {
            debug!("Switched to local playback, song list is stale");
            self.needs_songs.store(true, Ordering::Release);
        }

        if self.needs_songs.load(Ordering::Acquire) {
            if let Err(e) = self.refresh_songs().await {
                debug!(error = %e, "Song list refresh failed, retrying next tick");
            }
        }

        Ok(server)
    }

    /// Fetch the song list and replace it in the store.
    ///
    /// Returns the number of songs received.
    pub async fn refresh_songs(&self) -> PlayerPortResult<usize> {
        self.needs_songs.store(false, Ordering::Release);
        let songs = match self.api.fetch_songs().await {
            Ok(songs) => songs,
            Err(e) => {
                self.needs_songs.store(true, Ordering::Release);
                return Err(e);
            }
        };

        let count = songs.len();
        let _gate = self.gate.lock();
        if !self.cancel.is_cancelled() {
            self.store.apply(StatePatch {
                songs: Some(songs),
                ..StatePatch::default()
            });
            debug!(count, "Song list refreshed");
        }
        Ok(count)
    }

    /// Start ticking in the background.
    ///
    /// Must be called from within a tokio runtime. The first tick fires
    /// immediately; missed ticks are skipped rather than replayed.
    pub fn spawn(self) -> SyncHandle {
        let cancel = self.cancel.clone();
        let gate = Arc::clone(&self.gate);
        let join = tokio::spawn(self.run());
        SyncHandle {
            cancel,
            gate,
            join: Some(join),
        }
    }

    async fn run(self) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        debug!(period_ms = self.period.as_millis(), "Starting sync loop");

        loop {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                result = self.tick_once() => {
                    if let Err(e) = result {
                        debug!(error = %e, "State poll failed");
                    }
                }
            }
        }

        debug!("Sync loop cancelled");
    }
}

/// Owner of a running [`SyncLoop`]. Dropping the handle cancels the loop.
#[derive(Debug)]
pub struct SyncHandle {
    cancel: CancellationToken,
    gate: Arc<Mutex<()>>,
    join: Option<JoinHandle<()>>,
}

impl SyncHandle {
    /// Stop the loop.
    ///
    /// Once this returns no further poll result reaches the store and no
    /// further tick is issued, even if a request is still in flight.
    pub fn cancel(&self) {
        let _gate = self.gate.lock();
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancel and wait for the task to exit.
    pub async fn shutdown(mut self) {
        self.cancel();
        if let Some(join) = self.join.take() {
            if let Err(e) = join.await {
                debug!(error = %e, "Sync task ended abnormally");
            }
        }
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Endpoint, FakePlayerApi};
    use maestro_core::{PlaybackStatus, PlayerPortError};

    fn sync_loop(api: &Arc<FakePlayerApi>) -> (SyncLoop, Arc<StateStore>) {
        let store = Arc::new(StateStore::new());
        let config = ClientConfig::new().with_poll_interval(Duration::from_secs(5));
        (SyncLoop::new(&config, api.clone(), store.clone()), store)
    }

    #[tokio::test]
    async fn first_tick_loads_state_and_songs() {
        let api = Arc::new(FakePlayerApi::with_songs(&["a", "b", "c"]));
        api.set_server_index(2);
        let (sync, store) = sync_loop(&api);

        sync.tick_once().await.unwrap();

        let state = store.snapshot();
        assert_eq!(state.songs.len(), 3);
        assert_eq!(state.current_index, 2);
        assert_eq!(api.count(Endpoint::Songs), 1);

        // Songs are not re-fetched while the mode stays local.
        sync.tick_once().await.unwrap();
        assert_eq!(api.count(Endpoint::Songs), 1);
    }

    #[tokio::test]
    async fn failed_poll_leaves_state_untouched() {
        let api = Arc::new(FakePlayerApi::with_songs(&["a"]));
        let (sync, store) = sync_loop(&api);
        store.apply(StatePatch {
            status: Some(PlaybackStatus::Paused),
            ..StatePatch::default()
        });
        api.fail_next(
            Endpoint::State,
            PlayerPortError::Network {
                message: "connection refused".into(),
            },
        );

        assert!(sync.tick_once().await.is_err());
        assert_eq!(store.snapshot().status, PlaybackStatus::Paused);
        assert_eq!(api.count(Endpoint::Songs), 0);
    }

    #[tokio::test]
    async fn failed_song_fetch_is_retried() {
        let api = Arc::new(FakePlayerApi::with_songs(&["a", "b"]));
        let (sync, store) = sync_loop(&api);
        api.fail_next(Endpoint::Songs, PlayerPortError::Server { status: 500 });

        sync.tick_once().await.unwrap();
        assert!(store.snapshot().songs.is_empty());

        sync.tick_once().await.unwrap();
        assert_eq!(store.snapshot().songs.len(), 2);
    }

    #[tokio::test]
    async fn switching_into_local_mode_refreshes_songs() {
        let api = Arc::new(FakePlayerApi::with_songs(&["a"]));
        let (sync, _store) = sync_loop(&api);
        sync.tick_once().await.unwrap();

        api.set_server_mode(PlaybackMode::Remote);
        sync.tick_once().await.unwrap();
        assert_eq!(api.count(Endpoint::Songs), 1);

        api.set_server_mode(PlaybackMode::Local);
        sync.tick_once().await.unwrap();
        assert_eq!(api.count(Endpoint::Songs), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn handle_drop_stops_polling() {
        let api = Arc::new(FakePlayerApi::with_songs(&["a"]));
        let (sync, _store) = sync_loop(&api);

        let handle = sync.spawn();
        tokio::time::sleep(Duration::from_secs(11)).await;
        let polls = api.count(Endpoint::State);
        assert_eq!(polls, 3);

        drop(handle);
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(api.count(Endpoint::State), polls);
    }
}
