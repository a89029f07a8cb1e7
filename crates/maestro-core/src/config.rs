//! Client configuration shared by every component.
//!
//! One `ClientConfig` is built at the composition root and handed to each
//! component at construction; nothing reads a base URL or token from
//! ambient state.

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default backend location.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default interval between state polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default speech recognition language.
pub const DEFAULT_SPEECH_LANGUAGE: &str = "en-US";

/// Configuration validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Invalid media base URL '{url}': {reason}")]
    InvalidMediaBase { url: String, reason: String },

    #[error("Poll interval must be greater than zero")]
    ZeroPollInterval,
}

/// Configuration for the playback client.
///
/// # Example
///
/// ```
/// use maestro_core::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new()
///     .with_base_url("https://player.example.com")
///     .with_token("secret")
///     .with_poll_interval(Duration::from_secs(2));
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.media_base(), "https://player.example.com/music");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    token: Option<String>,
    poll_interval: Duration,
    request_timeout: Duration,
    media_base: Option<String>,
    speech_language: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            media_base: None,
            speech_language: DEFAULT_SPEECH_LANGUAGE.to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend base URL (scheme, host and optional prefix).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the bearer token attached to every request.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set an optional bearer token. Blank tokens count as absent.
    #[must_use]
    pub fn with_optional_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Set the state poll interval.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Override where media files are fetched from.
    ///
    /// Defaults to `{base_url}/music`.
    #[must_use]
    pub fn with_media_base(mut self, url: impl Into<String>) -> Self {
        self.media_base = Some(url.into());
        self
    }

    /// Set the speech recognition language tag.
    #[must_use]
    pub fn with_speech_language(mut self, language: impl Into<String>) -> Self {
        self.speech_language = language.into();
        self
    }

    /// Backend base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Bearer token, if authenticated.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn speech_language(&self) -> &str {
        &self.speech_language
    }

    /// Media base location without a trailing slash.
    pub fn media_base(&self) -> String {
        self.media_base.as_ref().map_or_else(
            || format!("{}/music", self.base_url()),
            |base| base.trim_end_matches('/').to_string(),
        )
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(self.base_url()).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if let Some(media) = &self.media_base {
            Url::parse(media).map_err(|e| ConfigError::InvalidMediaBase {
                url: media.clone(),
                reason: e.to_string(),
            })?;
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::new();
        assert_eq!(config.base_url(), "http://localhost:5000");
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.speech_language(), "en-US");
        assert!(config.token().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_media_base_derives_from_base_url() {
        let config = ClientConfig::new().with_base_url("https://api.example.com/");
        assert_eq!(config.base_url(), "https://api.example.com");
        assert_eq!(config.media_base(), "https://api.example.com/music");

        let custom = config.with_media_base("https://cdn.example.com/tracks/");
        assert_eq!(custom.media_base(), "https://cdn.example.com/tracks");
    }

    #[test]
    fn test_blank_token_is_absent() {
        let config = ClientConfig::new().with_optional_token(Some("  ".to_string()));
        assert!(config.token().is_none());

        let config = ClientConfig::new().with_optional_token(Some("abc".to_string()));
        assert_eq!(config.token(), Some("abc"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_url = ClientConfig::new().with_base_url("not a url");
        assert!(matches!(
            bad_url.validate(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));

        let zero = ClientConfig::new().with_poll_interval(Duration::ZERO);
        assert_eq!(zero.validate(), Err(ConfigError::ZeroPollInterval));
    }
}
