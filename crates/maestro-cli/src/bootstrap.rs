//! Composition root for CLI commands.

use std::sync::Arc;

use maestro_core::{ClientConfig, PlayerApi};
use maestro_http::DefaultPlayerClient;
use tracing::debug;

use crate::error::CliError;
use crate::parser::Cli;

/// Everything a handler needs.
pub struct CliContext {
    pub config: ClientConfig,
    pub api: Arc<dyn PlayerApi>,
}

/// Validate the configuration and build the HTTP client.
pub fn bootstrap(cli: &Cli) -> Result<CliContext, CliError> {
    let config = cli.client_config();
    config.validate()?;

    let api: Arc<dyn PlayerApi> = Arc::new(DefaultPlayerClient::new(&config)?);
    debug!(
        base_url = config.base_url(),
        authenticated = config.token().is_some(),
        "Client ready"
    );

    Ok(CliContext { config, api })
}
