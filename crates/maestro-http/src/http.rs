//! HTTP backend abstraction for the playback API.
//!
//! The client talks to a trait-based backend so tests can swap in canned
//! responses. The production implementation uses reqwest. There is no retry
//! loop here: polling is the retry mechanism for reads, and commands such as
//! `like` are not idempotent.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{HttpError, HttpResult};
use crate::models::rejection_message;

/// Internal connection settings derived from `ClientConfig`.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub base_url: Url,
    pub token: Option<String>,
    pub timeout: std::time::Duration,
    pub user_agent: String,
}

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends that exchange JSON with the playback API.
///
/// Paths are relative to the API base (e.g. `/api/state`).
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// `GET` a path and deserialize the body.
    async fn get_json<T: DeserializeOwned + Send>(&self, path: &str) -> HttpResult<T>;

    /// `POST` an optional JSON body and deserialize the response.
    async fn post_json<T: DeserializeOwned + Send>(
        &self,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> HttpResult<T>;

    /// `POST` without a body and discard whatever comes back.
    async fn post_ignore(&self, path: &str) -> HttpResult<()>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest.
pub struct ReqwestBackend {
    client: reqwest::Client,
    base_url: Url,
    auth_token: Option<String>,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    pub fn new(config: &HttpConfig) -> HttpResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            auth_token: config.token.clone(),
        })
    }

    fn url(&self, path: &str) -> HttpResult<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    /// Build a request with optional authentication.
    fn build_request(&self, method: Method, url: &Url) -> reqwest::RequestBuilder {
        let mut request = self.client.request(method, url.as_str());
        if let Some(ref token) = self.auth_token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        request
    }

    /// Send a request and turn non-success statuses into errors.
    async fn execute(&self, request: reqwest::RequestBuilder, url: &Url) -> HttpResult<String> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        debug!(status = status.as_u16(), url = %url, "Backend returned non-success status");
        Err(classify(status, &body, url.as_str()))
    }
}

/// Map a non-success response to an error.
///
/// 401/403 become `Unauthorized`, any other 4xx is an explicit `Rejected`
/// carrying the backend's `{ error }` message, everything else is a plain
/// request failure.
pub(crate) fn classify(status: StatusCode, body: &str, url: &str) -> HttpError {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return HttpError::Unauthorized {
            url: url.to_string(),
        };
    }

    if status.is_client_error() {
        return HttpError::Rejected {
            status: status.as_u16(),
            message: rejection_message(body),
        };
    }

    HttpError::ApiRequestFailed {
        status: status.as_u16(),
        url: url.to_string(),
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_json<T: DeserializeOwned + Send>(&self, path: &str) -> HttpResult<T> {
        let url = self.url(path)?;
        let body = self
            .execute(self.build_request(Method::GET, &url), &url)
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn post_json<T: DeserializeOwned + Send>(
        &self,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> HttpResult<T> {
        let url = self.url(path)?;
        let mut request = self.build_request(Method::POST, &url);
        if let Some(ref json) = body {
            request = request.json(json);
        }
        let response = self.execute(request, &url).await?;
        Ok(serde_json::from_str(&response)?)
    }

    async fn post_ignore(&self, path: &str) -> HttpResult<()> {
        let url = self.url(path)?;
        self.execute(self.build_request(Method::POST, &url), &url)
            .await?;
        Ok(())
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================

#[cfg(test)]
pub mod testing {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    /// Canned response for the fake backend.
    #[derive(Clone)]
    pub enum CannedResponse {
        /// 2xx with this JSON body.
        Json(serde_json::Value),
        /// Non-success status with this raw body.
        Status(u16, String),
    }

    /// A recorded request.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Recorded {
        pub method: &'static str,
        pub path: String,
        pub body: Option<serde_json::Value>,
    }

    /// A fake HTTP backend that returns canned responses by path.
    #[derive(Default)]
    pub struct FakeBackend {
        responses: HashMap<String, CannedResponse>,
        requests: Arc<Mutex<Vec<Recorded>>>,
    }

    impl FakeBackend {
        /// Create a new fake backend.
        pub fn new() -> Self {
            Self::default()
        }

        /// Answer `path` with a JSON body.
        pub fn with_json(mut self, path: &str, json: serde_json::Value) -> Self {
            self.responses
                .insert(path.to_string(), CannedResponse::Json(json));
            self
        }

        /// Answer `path` with a non-success status.
        pub fn with_status(mut self, path: &str, status: u16, body: &str) -> Self {
            self.responses.insert(
                path.to_string(),
                CannedResponse::Status(status, body.to_string()),
            );
            self
        }

        /// Requests seen so far.
        pub fn requests(&self) -> Arc<Mutex<Vec<Recorded>>> {
            Arc::clone(&self.requests)
        }

        fn respond(
            &self,
            method: &'static str,
            path: &str,
            body: Option<serde_json::Value>,
        ) -> HttpResult<serde_json::Value> {
            self.requests.lock().push(Recorded {
                method,
                path: path.to_string(),
                body,
            });

            match self.responses.get(path) {
                Some(CannedResponse::Json(json)) => Ok(json.clone()),
                Some(CannedResponse::Status(status, body)) => Err(classify(
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                    body,
                    path,
                )),
                None => Err(HttpError::ApiRequestFailed {
                    status: 404,
                    url: path.to_string(),
                }),
            }
        }
    }

    #[async_trait]
    impl HttpBackend for FakeBackend {
        async fn get_json<T: DeserializeOwned + Send>(&self, path: &str) -> HttpResult<T> {
            let json = self.respond("GET", path, None)?;
            serde_json::from_value(json).map_err(Into::into)
        }

        async fn post_json<T: DeserializeOwned + Send>(
            &self,
            path: &str,
            body: Option<serde_json::Value>,
        ) -> HttpResult<T> {
            let json = self.respond("POST", path, body)?;
            serde_json::from_value(json).map_err(Into::into)
        }

        async fn post_ignore(&self, path: &str) -> HttpResult<()> {
            self.respond("POST", path, None).map(|_| ())
        }
    }
}
