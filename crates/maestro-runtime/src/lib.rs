//! Runtime services for maestro.
//!
//! - [`CommandDispatcher`]: optimistic command execution with per-field
//!   sequencing
//! - [`SyncLoop`]: periodic reconciliation with the backend
//! - [`GestureToggleAdapter`]: fire-and-forget gesture control
//! - [`Session`]: the above wired together for one login

pub mod dispatcher;
pub mod gesture;
pub mod session;
pub mod sync_loop;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use dispatcher::{CommandDispatcher, DispatchError, DispatchOutcome};
pub use gesture::{GestureState, GestureToggleAdapter};
pub use session::Session;
pub use sync_loop::{SyncHandle, SyncLoop};

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;
