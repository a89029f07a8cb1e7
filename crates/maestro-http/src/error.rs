//! Internal error types for backend HTTP operations.
//!
//! These errors are internal to `maestro-http` and are mapped to
//! `PlayerPortError` at the port boundary.

use thiserror::Error;

/// Result type alias for HTTP operations.
pub type HttpResult<T> = Result<T, HttpError>;

/// Errors related to talking to the playback backend.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The backend answered with a server-side failure.
    #[error("Backend request failed with status {status}: {url}")]
    ApiRequestFailed {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// The backend refused the request (4xx or an `error` body).
    #[error("Backend rejected request with status {status}: {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Message from the `error` field, or the raw body
        message: String,
    },

    /// 401 or 403.
    #[error("Backend refused credentials for {url}")]
    Unauthorized {
        /// The URL that was requested
        url: String,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_request_failed_error_message() {
        let error = HttpError::ApiRequestFailed {
            status: 502,
            url: "http://localhost:5000/api/state".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("502"));
        assert!(msg.contains("/api/state"));
    }

    #[test]
    fn test_rejected_error_message() {
        let error = HttpError::Rejected {
            status: 400,
            message: "Invalid index".to_string(),
        };
        assert!(error.to_string().contains("Invalid index"));
    }
}
