//! The shared playback state store.
//!
//! One `StateStore` exists per session. It is the only place a
//! [`PlaybackState`] lives, and [`apply`](StateStore::apply) is the only way
//! to change it:
//!
//! - patches merge last-writer-wins per field
//! - `current_index` is clamped back into bounds after every merge
//! - subscribers are woken only when a value actually changed
//!
//! Every application is stamped with a monotonic [`Revision`], and each
//! field remembers the revision that last wrote it. That lets a writer undo
//! its own patch later ([`revert`](StateStore::revert)) without clobbering
//! anything written in between.

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::trace;

use crate::domain::{Field, PlaybackState, StatePatch};

/// Monotonic write stamp assigned by [`StateStore::apply`].
pub type Revision = u64;

/// Result of [`StateStore::apply_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    /// Revision stamped on the written fields.
    pub revision: Revision,
    /// The pre-write values of those fields.
    pub undo: StatePatch,
}

#[derive(Debug, Default)]
struct WriteLog {
    current: Revision,
    per_field: [Revision; Field::COUNT],
}

/// Canonical in-client playback state plus change notification.
#[derive(Debug)]
pub struct StateStore {
    tx: watch::Sender<PlaybackState>,
    log: Mutex<WriteLog>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    /// Create a store holding the default session state.
    pub fn new() -> Self {
        Self::with_state(PlaybackState::default())
    }

    /// Create a store seeded with `state` (clamped on entry).
    pub fn with_state(mut state: PlaybackState) -> Self {
        state.clamp_index();
        let (tx, _rx) = watch::channel(state);
        Self {
            tx,
            log: Mutex::new(WriteLog::default()),
        }
    }

    /// Read-only copy of the current state.
    pub fn snapshot(&self) -> PlaybackState {
        self.tx.borrow().clone()
    }

    /// Receiver that observes every subsequent change.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.tx.subscribe()
    }

    /// Revision of the most recent write.
    pub fn revision(&self) -> Revision {
        self.log.lock().current
    }

    /// Revision that last wrote `field` (0 if never written).
    pub fn field_revision(&self, field: Field) -> Revision {
        self.log.lock().per_field[field.index()]
    }

    /// Merge `patch` into the state.
    ///
    /// Returns the revision stamped on every field the patch names. An empty
    /// patch writes nothing and returns the current revision.
    pub fn apply(&self, patch: StatePatch) -> Revision {
        let mut log = self.log.lock();
        if patch.is_empty() {
            return log.current;
        }
        self.write(&mut log, &patch)
    }

    /// Derive a patch from the current state and apply it atomically.
    ///
    /// No other write can land between reading the state and applying the
    /// derived patch. Returns `None` if `derive` produced an empty patch.
    pub fn apply_with(&self, derive: impl FnOnce(&PlaybackState) -> StatePatch) -> Option<Applied> {
        let mut log = self.log.lock();
        let (patch, undo) = {
            let state = self.tx.borrow();
            let patch = derive(&state);
            let undo = StatePatch::capture(&state, &patch.fields());
            (patch, undo)
        };
        if patch.is_empty() {
            return None;
        }
        let revision = self.write(&mut log, &patch);
        Some(Applied { revision, undo })
    }

    /// Apply only those fields of `patch` still owned by `revision`.
    ///
    /// A field is owned by `revision` if no later write has touched it.
    /// Returns `true` if anything was written.
    pub fn revert(&self, patch: StatePatch, revision: Revision) -> bool {
        let mut log = self.log.lock();
        let owned = patch.retain(|field| log.per_field[field.index()] == revision);
        if owned.is_empty() {
            return false;
        }
        self.write(&mut log, &owned);
        true
    }

    fn write(&self, log: &mut WriteLog, patch: &StatePatch) -> Revision {
        log.current += 1;
        let revision = log.current;
        for field in patch.fields() {
            log.per_field[field.index()] = revision;
        }

        let changed = self.tx.send_if_modified(|state| {
            let merged = patch.merge_into(state);
            let clamped = state.clamp_index();
            merged || clamped
        });
        trace!(revision, changed, fields = ?patch.fields(), "State patch applied");
        revision
    }
}
