use std::sync::Arc;

use maestro_core::{Command, Origin, StateStore};
use maestro_gui::NowPlaying;
use maestro_runtime::{CommandDispatcher, SyncLoop};

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Send one command and print the resulting state.
///
/// Polls first so index-relative commands have a song list to work from.
pub async fn execute(ctx: &CliContext, command: Command) -> Result<(), CliError> {
    let store = Arc::new(StateStore::new());
    SyncLoop::new(&ctx.config, Arc::clone(&ctx.api), Arc::clone(&store))
        .tick_once()
        .await?;

    let dispatcher = CommandDispatcher::new(Arc::clone(&ctx.api), Arc::clone(&store));
    let outcome = dispatcher
        .dispatch(command.with_origin(Origin::Manual))
        .await?;

    println!("{command}: ok");
    if !outcome.superseded.is_empty() {
        println!("(superseded: {:?})", outcome.superseded);
    }
    print!("{}", NowPlaying::from(&store.snapshot()));
    Ok(())
}
