//! Command dispatch with optimistic updates.
//!
//! Every command goes through two phases:
//!
//! ```text
//!   begin (sync)                         complete (async)
//!   ─────────────────────────────────    ──────────────────────────────────
//!   apply optimistic patch           →   send request
//!   bump sequences of written fields     ack   → apply claimed, fresh fields
//!                                        error → log; revert on rejection
//! ```
//!
//! The optimistic patch is always in the store before any network activity
//! starts. Responses are not ordered relative to each other; instead each
//! field carries a monotonic sequence number and a response may only write
//! a field whose latest sequence it still holds. Only fields the optimistic
//! patch actually wrote advance the sequence. A stale acknowledgement from an
//! older command therefore cannot overwrite a newer command's value, and a
//! command that predicted nothing does not shadow earlier responses.
//!
//! Failures keep the optimistic patch (the next poll corrects it), except
//! when the backend explicitly rejected the request: then the fields this
//! command wrote are restored, unless something else has written them since.

use std::sync::Arc;

use maestro_core::{
    Applied, Command, Field, Origin, PlayerApi, PlayerPortError, StatePatch, StateStore,
    TaggedCommand,
};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

// ── Per-field sequencing ───────────────────────────────────────────

/// Latest issued sequence number per field.
#[derive(Debug, Default)]
struct FieldClock {
    latest: [u64; Field::COUNT],
}

impl FieldClock {
    /// Take a sequence number per field: a fresh one for every field in
    /// `written`, the current one for the rest of `claimed`.
    ///
    /// A command that predicted nothing for a field does not supersede
    /// earlier commands on it; its response may still land if nobody has
    /// written the field since.
    fn issue(&mut self, claimed: &[Field], written: &[Field]) -> Vec<(Field, u64)> {
        claimed
            .iter()
            .map(|field| {
                let slot = &mut self.latest[field.index()];
                if written.contains(field) {
                    *slot += 1;
                }
                (*field, *slot)
            })
            .collect()
    }

    fn is_latest(&self, field: Field, seq: u64) -> bool {
        self.latest[field.index()] == seq
    }
}

// ── Outcomes ───────────────────────────────────────────────────────

/// What happened to a successfully completed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub command: TaggedCommand,
    /// Fields written from the authoritative response.
    pub applied: Vec<Field>,
    /// Fields in the response dropped because a newer command owns them.
    pub superseded: Vec<Field>,
}

impl DispatchOutcome {
    const fn unacknowledged(command: TaggedCommand) -> Self {
        Self {
            command,
            applied: Vec::new(),
            superseded: Vec::new(),
        }
    }
}

/// A command whose request failed.
#[derive(Debug, Error)]
#[error("{command} from {origin:?} failed: {source}")]
pub struct DispatchError {
    pub command: Command,
    pub origin: Origin,
    #[source]
    pub source: PlayerPortError,
    /// Whether the optimistic patch was rolled back.
    pub reverted: bool,
}

/// Bookkeeping carried from `begin` to `complete`.
#[derive(Debug)]
struct Ticket {
    command: TaggedCommand,
    seqs: Vec<(Field, u64)>,
    optimistic: Option<Applied>,
}

impl Ticket {
    fn seq_for(&self, field: Field) -> Option<u64> {
        self.seqs
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, seq)| *seq)
    }
}

// ── Dispatcher ─────────────────────────────────────────────────────

/// Turns commands into optimistic patches plus backend requests.
///
/// The dispatcher and the sync loop are the only writers of the store.
pub struct CommandDispatcher {
    api: Arc<dyn PlayerApi>,
    store: Arc<StateStore>,
    clock: Mutex<FieldClock>,
}

impl CommandDispatcher {
    pub fn new(api: Arc<dyn PlayerApi>, store: Arc<StateStore>) -> Self {
        Self {
            api,
            store,
            clock: Mutex::new(FieldClock::default()),
        }
    }

    /// The store this dispatcher writes to.
    pub const fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    /// Apply the optimistic patch, then send the request and reconcile.
    ///
    /// The optimistic patch is applied before the first suspension point.
    pub async fn dispatch(&self, command: TaggedCommand) -> Result<DispatchOutcome, DispatchError> {
        let ticket = self.begin(command);
        self.complete(ticket).await
    }

    /// Apply the optimistic patch now and run the request in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn fire(
        self: &Arc<Self>,
        command: TaggedCommand,
    ) -> JoinHandle<Result<DispatchOutcome, DispatchError>> {
        let ticket = self.begin(command);
        let this = Arc::clone(self);
        tokio::spawn(async move { this.complete(ticket).await })
    }

    fn begin(&self, tagged: TaggedCommand) -> Ticket {
        let command = tagged.command;
        let mut clock = self.clock.lock();
        let mut written = Vec::new();
        let optimistic = self.store.apply_with(|state| {
            let patch = command.optimistic_patch(state);
            written = patch.fields();
            patch
        });
        let seqs = clock.issue(command.claims(), &written);

        debug!(
            command = %command,
            origin = ?tagged.origin,
            optimistic = optimistic.is_some(),
            "Command issued"
        );

        Ticket {
            command: tagged,
            seqs,
            optimistic,
        }
    }

    async fn complete(&self, ticket: Ticket) -> Result<DispatchOutcome, DispatchError> {
        let command = ticket.command.command;

        if command.is_local() {
            return Ok(DispatchOutcome::unacknowledged(ticket.command));
        }

        if command.is_fire_and_forget() {
            let active = command == Command::GestureStart;
            // The acknowledgement is never inspected.
            if let Err(e) = self.api.set_gesture(active).await {
                debug!(active, error = %e, "Gesture toggle request failed");
            }
            return Ok(DispatchOutcome::unacknowledged(ticket.command));
        }

        let result = match (command, command.action()) {
            (Command::PlayIndex(index), _) => self.api.play_index(index).await,
            (_, Some(action)) => self.api.send_action(action).await,
            (_, None) => return Ok(DispatchOutcome::unacknowledged(ticket.command)),
        };

        match result {
            Ok(ack) => Ok(self.reconcile(&ticket, ack.to_patch())),
            Err(source) => Err(self.fail(ticket, source)),
        }
    }

    /// Write the claimed fields of `authoritative` this command still owns.
    fn reconcile(&self, ticket: &Ticket, authoritative: StatePatch) -> DispatchOutcome {
        let mut applied = Vec::new();
        let mut superseded = Vec::new();

        let clock = self.clock.lock();
        let fresh = authoritative.retain(|field| match ticket.seq_for(field) {
            Some(seq) if clock.is_latest(field, seq) => {
                applied.push(field);
                true
            }
            Some(_) => {
                superseded.push(field);
                false
            }
            None => false,
        });
        self.store.apply(fresh);
        drop(clock);

        debug!(
            command = %ticket.command.command,
            origin = ?ticket.command.origin,
            ?applied,
            ?superseded,
            "Command acknowledged"
        );

        DispatchOutcome {
            command: ticket.command,
            applied,
            superseded,
        }
    }

    fn fail(&self, ticket: Ticket, source: PlayerPortError) -> DispatchError {
        let reverted = match ticket.optimistic {
            Some(optimistic) if source.is_rejection() => {
                self.store.revert(optimistic.undo, optimistic.revision)
            }
            _ => false,
        };

        warn!(
            command = %ticket.command.command,
            origin = ?ticket.command.origin,
            error = %source,
            reverted,
            "Command failed"
        );

        DispatchError {
            command: ticket.command.command,
            origin: ticket.command.origin,
            source,
            reverted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Endpoint, FakePlayerApi};
    use maestro_core::{PlaybackStatus, PlayerAction};

    fn setup(songs: &[&str]) -> (Arc<FakePlayerApi>, Arc<StateStore>, Arc<CommandDispatcher>) {
        let api = Arc::new(FakePlayerApi::with_songs(songs));
        let store = Arc::new(StateStore::new());
        store.apply(StatePatch {
            songs: Some(songs.iter().map(ToString::to_string).collect()),
            ..Default::default()
        });
        let dispatcher = Arc::new(CommandDispatcher::new(api.clone(), store.clone()));
        (api, store, dispatcher)
    }

    #[test]
    fn clock_issues_monotonic_sequences() {
        let mut clock = FieldClock::default();
        let both = [Field::Status, Field::CurrentIndex];
        let first = clock.issue(&[Field::Status], &[Field::Status]);
        let second = clock.issue(&both, &both);
        assert_eq!(first, vec![(Field::Status, 1)]);
        assert_eq!(second, vec![(Field::Status, 2), (Field::CurrentIndex, 1)]);
        assert!(!clock.is_latest(Field::Status, 1));
        assert!(clock.is_latest(Field::Status, 2));
    }

    #[test]
    fn clock_does_not_advance_unwritten_fields() {
        let mut clock = FieldClock::default();
        let both = [Field::Status, Field::CurrentIndex];
        clock.issue(&both, &both);

        let observed = clock.issue(&both, &[]);
        assert_eq!(observed, vec![(Field::Status, 1), (Field::CurrentIndex, 1)]);
        assert!(clock.is_latest(Field::CurrentIndex, 1));
    }

    #[tokio::test]
    async fn play_index_ack_sets_index_and_status() {
        let (_api, store, dispatcher) = setup(&["a", "b", "c"]);
        for i in 0..3 {
            let outcome = dispatcher
                .dispatch(Command::PlayIndex(i).with_origin(Origin::Manual))
                .await
                .unwrap();
            assert!(outcome.superseded.is_empty());

            let state = store.snapshot();
            assert_eq!(state.current_index, i);
            assert_eq!(state.status, PlaybackStatus::Playing);
        }
    }

    #[tokio::test]
    async fn optimistic_patch_lands_before_request() {
        let (api, store, dispatcher) = setup(&["a", "b", "c"]);
        let release = api.defer_next(Endpoint::Action(PlayerAction::Like));

        let handle = dispatcher.fire(Command::Like.with_origin(Origin::Manual));
        // Request is parked; the optimistic increment is already visible.
        assert_eq!(store.snapshot().likes, 1);

        release.send(()).unwrap();
        handle.await.unwrap().unwrap();
        assert_eq!(store.snapshot().likes, 1);
    }

    #[tokio::test]
    async fn voice_commands_are_local() {
        let (api, store, dispatcher) = setup(&[]);
        dispatcher
            .dispatch(Command::VoiceStart.with_origin(Origin::Voice))
            .await
            .unwrap();
        assert!(store.snapshot().voice_listening);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn unclaimed_ack_fields_are_ignored() {
        let (api, store, dispatcher) = setup(&["a", "b"]);
        api.set_server_index(1);

        // The backend answers play with `{status}` only, but even if it
        // reported more, play does not own current_index.
        dispatcher
            .dispatch(Command::Play.with_origin(Origin::Voice))
            .await
            .unwrap();
        assert_eq!(store.snapshot().current_index, 0);
        assert_eq!(store.snapshot().status, PlaybackStatus::Playing);
    }

    #[tokio::test]
    async fn server_error_keeps_optimistic_patch() {
        let (api, store, dispatcher) = setup(&["a", "b", "c"]);
        api.fail_next(
            Endpoint::Action(PlayerAction::Next),
            PlayerPortError::Server { status: 503 },
        );

        let err = dispatcher
            .dispatch(Command::Next.with_origin(Origin::Gesture))
            .await
            .unwrap_err();
        assert!(!err.reverted);
        assert_eq!(err.origin, Origin::Gesture);
        assert_eq!(store.snapshot().current_index, 1);
    }
}
