//! HTTP adapter for the maestro playback backend.
//!
//! Implements the core `PlayerApi` port on top of reqwest. A bearer token
//! from `ClientConfig` is attached to every request when present.
//!
//! ```no_run
//! use maestro_core::{ClientConfig, PlayerApi};
//! use maestro_http::DefaultPlayerClient;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DefaultPlayerClient::new(&ClientConfig::new())?;
//! let state = client.fetch_state().await?;
//! println!("{:?}", state.status);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod client;
mod error;
mod http;
mod models;
mod port;

// ============================================================================
// Public API
// ============================================================================

pub use client::{DefaultPlayerClient, PlayerClient};
pub use error::{HttpError, HttpResult};
pub use http::{HttpBackend, HttpConfig, ReqwestBackend};

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;
