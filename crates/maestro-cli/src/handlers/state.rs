use std::sync::Arc;

use maestro_core::StateStore;
use maestro_gui::NowPlaying;
use maestro_runtime::SyncLoop;

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Poll once and print what the widget would show.
pub async fn execute(ctx: &CliContext, json: bool) -> Result<(), CliError> {
    let store = Arc::new(StateStore::new());
    SyncLoop::new(&ctx.config, Arc::clone(&ctx.api), Arc::clone(&store))
        .tick_once()
        .await?;

    let view = NowPlaying::from(&store.snapshot());
    if json {
        let text =
            serde_json::to_string_pretty(&view).map_err(|e| CliError::Io(e.to_string()))?;
        println!("{text}");
    } else {
        print!("{view}");
    }
    Ok(())
}
