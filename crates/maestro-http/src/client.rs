//! Playback API client.

use maestro_core::ClientConfig;
use url::Url;

use crate::error::HttpResult;
use crate::http::{HttpBackend, HttpConfig, ReqwestBackend};

/// Default client using the reqwest HTTP backend.
pub type DefaultPlayerClient = PlayerClient<ReqwestBackend>;

/// Client for the playback backend.
///
/// Generic over the HTTP backend so tests can inject canned responses.
/// Use [`DefaultPlayerClient`] in production and talk to it through the
/// `PlayerApi` port.
pub struct PlayerClient<B: HttpBackend> {
    pub(crate) backend: B,
}

impl DefaultPlayerClient {
    /// Create a client from the shared client configuration.
    pub fn new(config: &ClientConfig) -> HttpResult<Self> {
        let internal = Self::to_internal_config(config)?;
        let backend = ReqwestBackend::new(&internal)?;
        Ok(Self { backend })
    }

    fn to_internal_config(config: &ClientConfig) -> HttpResult<HttpConfig> {
        Ok(HttpConfig {
            base_url: Url::parse(config.base_url())?,
            token: config.token().map(ToString::to_string),
            timeout: config.request_timeout(),
            user_agent: concat!("maestro/", env!("CARGO_PKG_VERSION")).to_string(),
        })
    }
}

impl<B: HttpBackend> PlayerClient<B> {
    /// Create a client with a custom backend.
    pub const fn with_backend(backend: B) -> Self {
        Self { backend }
    }
}
