//! Main CLI parser and top-level argument handling.
//!
//! Connection settings can come from flags, the environment or a `.env`
//! file, in that order of precedence.

use std::time::Duration;

use clap::Parser;
use maestro_core::ClientConfig;
use maestro_core::config::{DEFAULT_BASE_URL, DEFAULT_SPEECH_LANGUAGE};

use crate::commands::Commands;

/// Remote playback client with voice and gesture control.
#[derive(Parser)]
#[command(name = "maestro")]
#[command(about = "Control a maestro playback backend from the terminal")]
#[command(version)]
pub struct Cli {
    /// Backend base URL
    #[arg(long = "api-url", env = "MAESTRO_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub api_url: String,

    /// Bearer token issued at login
    #[arg(long, env = "MAESTRO_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Seconds between state polls
    #[arg(long = "poll-secs", env = "MAESTRO_POLL_SECS", default_value_t = 5, global = true)]
    pub poll_secs: u64,

    /// Base URL media files are served from (defaults to `<api-url>/music`)
    #[arg(long = "media-base", global = true)]
    pub media_base: Option<String>,

    /// Speech recognition language
    #[arg(long, default_value = DEFAULT_SPEECH_LANGUAGE, global = true)]
    pub language: String,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Client configuration described by the parsed arguments.
    ///
    /// Not validated here; components validate on construction.
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new()
            .with_base_url(&self.api_url)
            .with_optional_token(self.token.clone())
            .with_poll_interval(Duration::from_secs(self.poll_secs))
            .with_speech_language(&self.language);
        if let Some(media_base) = &self.media_base {
            config = config.with_media_base(media_base);
        }
        config
    }
}
