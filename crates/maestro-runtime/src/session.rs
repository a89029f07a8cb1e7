//! One logged-in session.
//!
//! A session owns the store, the dispatcher, the gesture toggle and the
//! running sync loop. Everything is created at login and dropped together
//! at logout.

use std::sync::Arc;

use maestro_core::{ClientConfig, ConfigError, PlayerApi, StateStore};
use tracing::info;

use crate::dispatcher::CommandDispatcher;
use crate::gesture::GestureToggleAdapter;
use crate::sync_loop::{SyncHandle, SyncLoop};

pub struct Session {
    config: ClientConfig,
    store: Arc<StateStore>,
    dispatcher: Arc<CommandDispatcher>,
    gesture: GestureToggleAdapter,
    sync: SyncHandle,
}

impl Session {
    /// Validate `config`, build the components and start polling.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns the first configuration problem found; nothing is started.
    pub fn start(config: ClientConfig, api: Arc<dyn PlayerApi>) -> Result<Self, ConfigError> {
        config.validate()?;

        let store = Arc::new(StateStore::new());
        let dispatcher = Arc::new(CommandDispatcher::new(
            Arc::clone(&api),
            Arc::clone(&store),
        ));
        let gesture = GestureToggleAdapter::new(Arc::clone(&dispatcher));
        let sync = SyncLoop::new(&config, api, Arc::clone(&store)).spawn();

        info!(base_url = config.base_url(), "Session started");

        Ok(Self {
            config,
            store,
            dispatcher,
            gesture,
            sync,
        })
    }

    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub const fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    pub const fn dispatcher(&self) -> &Arc<CommandDispatcher> {
        &self.dispatcher
    }

    pub const fn gesture(&self) -> &GestureToggleAdapter {
        &self.gesture
    }

    /// Stop polling and wait for the sync task to exit.
    ///
    /// Requests already handed to the dispatcher may still complete and
    /// write to the store, which is dropped with the last reference.
    pub async fn end(self) {
        self.sync.shutdown().await;
        info!("Session ended");
    }
}
