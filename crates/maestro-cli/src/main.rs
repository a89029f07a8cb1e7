//! CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use maestro_cli::{Cli, CliError, Commands, bootstrap, handlers, logging};
use maestro_gui::Button;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = bootstrap(&cli)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => handlers::run::execute(ctx).await?,
        Commands::State { json } => handlers::state::execute(&ctx, json).await?,
        Commands::Send { action } => {
            let button = Button::from_label(&action).ok_or_else(|| {
                CliError::Arguments(format!("unknown action '{action}'"))
            })?;
            handlers::send::execute(&ctx, button.command()).await?;
        }
        Commands::PlayIndex { index } => {
            handlers::send::execute(&ctx, maestro_core::Command::PlayIndex(index)).await?;
        }
    }
    Ok(())
}
