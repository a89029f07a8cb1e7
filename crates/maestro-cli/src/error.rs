//! CLI-specific error types and mappings.

use maestro_core::{ConfigError, PlayerPortError};
use maestro_http::HttpError;
use maestro_runtime::DispatchError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument or input error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The backend failed or refused a request.
    #[error("Backend error: {0}")]
    Backend(String),

    /// Terminal IO error.
    #[error("IO error: {0}")]
    Io(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow sysexits.h where one fits.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Config(_) => 78,   // EX_CONFIG
            Self::Backend(_) => 69,  // EX_UNAVAILABLE
            Self::Io(_) => 74,       // EX_IOERR
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<HttpError> for CliError {
    fn from(err: HttpError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<PlayerPortError> for CliError {
    fn from(err: PlayerPortError) -> Self {
        match err {
            PlayerPortError::Configuration { message } => Self::Config(message),
            PlayerPortError::Unauthorized => {
                Self::Config("not authorized (check MAESTRO_TOKEN)".to_string())
            }
            other => Self::Backend(other.to_string()),
        }
    }
}

impl From<DispatchError> for CliError {
    fn from(err: DispatchError) -> Self {
        let command = err.command;
        match Self::from(err.source) {
            Self::Backend(message) => Self::Backend(format!("{command}: {message}")),
            other => other,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        Self::Io(err.to_string())
    }
}
