//! Gesture control toggle.
//!
//! The adapter only asks the backend to start or stop its gesture service.
//! Requests are fire-and-forget, so the local flag follows the last request
//! and `gesture_active` in the store is corrected by the next poll.

use std::sync::Arc;

use maestro_core::{Command, Origin};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::info;

use crate::dispatcher::{CommandDispatcher, DispatchError, DispatchOutcome};

/// Local view of the gesture service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Off,
    On,
}

/// Issues gesture start/stop commands on behalf of the user.
pub struct GestureToggleAdapter {
    dispatcher: Arc<CommandDispatcher>,
    state: Mutex<GestureState>,
}

type Pending = JoinHandle<Result<DispatchOutcome, DispatchError>>;

impl GestureToggleAdapter {
    pub fn new(dispatcher: Arc<CommandDispatcher>) -> Self {
        Self {
            dispatcher,
            state: Mutex::new(GestureState::Off),
        }
    }

    pub fn state(&self) -> GestureState {
        *self.state.lock()
    }

    /// Request gesture control on. `gesture_active` is set before returning.
    pub fn start(&self) -> Pending {
        self.request(|_| GestureState::On)
    }

    /// Request gesture control off. `gesture_active` is cleared before returning.
    pub fn stop(&self) -> Pending {
        self.request(|_| GestureState::Off)
    }

    /// Flip to the opposite of the last request.
    pub fn toggle(&self) -> Pending {
        self.request(|current| match current {
            GestureState::Off => GestureState::On,
            GestureState::On => GestureState::Off,
        })
    }

    /// Pick the target from the current state and fire it under one lock.
    fn request(&self, decide: impl FnOnce(GestureState) -> GestureState) -> Pending {
        let mut state = self.state.lock();
        let target = decide(*state);
        *state = target;
        let command = match target {
            GestureState::On => Command::GestureStart,
            GestureState::Off => Command::GestureStop,
        };
        info!(?target, "Gesture control requested");
        self.dispatcher.fire(command.with_origin(Origin::Gesture))
    }
}
