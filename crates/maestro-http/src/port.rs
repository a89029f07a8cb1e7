//! `PlayerApi` implementation for `PlayerClient`.
//!
//! Maps endpoint calls onto the HTTP backend and converts internal
//! `HttpError`s into core `PlayerPortError`s.

use async_trait::async_trait;
use maestro_core::{
    CommandAck, PlayerAction, PlayerApi, PlayerPortError, PlayerPortResult, ServerState,
};
use tracing::debug;

use crate::client::PlayerClient;
use crate::error::HttpError;
use crate::http::HttpBackend;
use crate::models::{AckBody, PlayIndexRequest, SongsResponse};

const STATE_PATH: &str = "/api/state";
const SONGS_PATH: &str = "/api/songs";
const PLAY_INDEX_PATH: &str = "/api/play_index";
const GESTURE_START_PATH: &str = "/api/gesture/start";
const GESTURE_STOP_PATH: &str = "/api/gesture/stop";

// ============================================================================
// Error Mapping
// ============================================================================

/// Convert internal `HttpError` to core `PlayerPortError`.
fn map_error(err: HttpError) -> PlayerPortError {
    match err {
        HttpError::ApiRequestFailed { status, .. } => PlayerPortError::Server { status },
        HttpError::Rejected { status, message } => PlayerPortError::Rejected { status, message },
        HttpError::Unauthorized { .. } => PlayerPortError::Unauthorized,
        HttpError::Network(e) if e.is_builder() => PlayerPortError::Configuration {
            message: e.to_string(),
        },
        HttpError::Network(e) => PlayerPortError::Network {
            message: e.to_string(),
        },
        HttpError::InvalidUrl(e) => PlayerPortError::Configuration {
            message: e.to_string(),
        },
        HttpError::JsonParse(e) => PlayerPortError::InvalidResponse {
            message: e.to_string(),
        },
    }
}

/// A 2xx body carrying `error` is still a refusal.
fn into_ack(body: AckBody) -> PlayerPortResult<CommandAck> {
    match body.error {
        Some(message) => Err(PlayerPortError::Rejected {
            status: 200,
            message,
        }),
        None => Ok(body.ack),
    }
}

// ============================================================================
// Port Implementation
// ============================================================================

#[async_trait]
impl<B: HttpBackend> PlayerApi for PlayerClient<B> {
    async fn fetch_state(&self) -> PlayerPortResult<ServerState> {
        self.backend
            .get_json::<ServerState>(STATE_PATH)
            .await
            .map_err(map_error)
    }

    async fn fetch_songs(&self) -> PlayerPortResult<Vec<String>> {
        let response = self
            .backend
            .get_json::<SongsResponse>(SONGS_PATH)
            .await
            .map_err(map_error)?;
        Ok(response.songs)
    }

    async fn send_action(&self, action: PlayerAction) -> PlayerPortResult<CommandAck> {
        debug!(path = action.path(), "Sending player action");
        let body = self
            .backend
            .post_json::<AckBody>(action.path(), None)
            .await
            .map_err(map_error)?;
        into_ack(body)
    }

    async fn play_index(&self, index: usize) -> PlayerPortResult<CommandAck> {
        debug!(index, "Requesting track by index");
        let request = serde_json::to_value(PlayIndexRequest { index }).map_err(|e| {
            PlayerPortError::InvalidResponse {
                message: e.to_string(),
            }
        })?;
        let body = self
            .backend
            .post_json::<AckBody>(PLAY_INDEX_PATH, Some(request))
            .await
            .map_err(map_error)?;
        into_ack(body)
    }

    async fn set_gesture(&self, active: bool) -> PlayerPortResult<()> {
        let path = if active {
            GESTURE_START_PATH
        } else {
            GESTURE_STOP_PATH
        };
        self.backend.post_ignore(path).await.map_err(map_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::FakeBackend;
    use maestro_core::{PlaybackMode, PlaybackStatus};
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_state_parses_payload() {
        let client = PlayerClient::with_backend(FakeBackend::new().with_json(
            "/api/state",
            json!({
                "mode": "local",
                "status": "paused",
                "current_index": 3,
                "voice": false,
                "gesture": true
            }),
        ));

        let state = client.fetch_state().await.unwrap();
        assert_eq!(state.mode, Some(PlaybackMode::Local));
        assert_eq!(state.status, Some(PlaybackStatus::Paused));
        assert_eq!(state.current_index, Some(3));
        assert_eq!(state.gesture, Some(true));
        assert_eq!(state.likes, None);
    }

    #[tokio::test]
    async fn test_fetch_state_rejects_unknown_status() {
        let client = PlayerClient::with_backend(
            FakeBackend::new().with_json("/api/state", json!({"status": "buffering"})),
        );
        assert!(matches!(
            client.fetch_state().await,
            Err(PlayerPortError::InvalidResponse { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_songs() {
        let client = PlayerClient::with_backend(
            FakeBackend::new().with_json("/api/songs", json!({"songs": ["a.mp3", "b.wav"]})),
        );
        assert_eq!(client.fetch_songs().await.unwrap(), vec!["a.mp3", "b.wav"]);
    }

    #[tokio::test]
    async fn test_play_index_sends_body() {
        let backend = FakeBackend::new().with_json(
            "/api/play_index",
            json!({"status": "playing", "current_index": 2}),
        );
        let requests = backend.requests();
        let client = PlayerClient::with_backend(backend);

        let ack = client.play_index(2).await.unwrap();
        assert_eq!(ack.current_index, Some(2));
        assert_eq!(ack.status, Some(PlaybackStatus::Playing));

        let seen = requests.lock();
        assert_eq!(seen[0].path, "/api/play_index");
        assert_eq!(seen[0].body, Some(json!({"index": 2})));
    }

    #[tokio::test]
    async fn test_play_index_invalid_is_rejection() {
        let client = PlayerClient::with_backend(FakeBackend::new().with_status(
            "/api/play_index",
            400,
            r#"{"error": "Invalid index"}"#,
        ));
        let err = client.play_index(9).await.unwrap_err();
        assert_eq!(
            err,
            PlayerPortError::Rejected {
                status: 400,
                message: "Invalid index".to_string()
            }
        );
        assert!(err.is_rejection());
    }

    #[tokio::test]
    async fn test_error_body_on_success_status_is_rejection() {
        let client = PlayerClient::with_backend(
            FakeBackend::new().with_json("/api/like", json!({"error": "not supported"})),
        );
        let err = client.send_action(PlayerAction::Like).await.unwrap_err();
        assert!(err.is_rejection());
    }

    #[tokio::test]
    async fn test_server_error_is_not_rejection() {
        let client =
            PlayerClient::with_backend(FakeBackend::new().with_status("/api/next", 503, ""));
        let err = client.send_action(PlayerAction::Next).await.unwrap_err();
        assert_eq!(err, PlayerPortError::Server { status: 503 });
        assert!(!err.is_rejection());
    }

    #[tokio::test]
    async fn test_volume_ack() {
        let client = PlayerClient::with_backend(
            FakeBackend::new().with_json("/api/volume_up", json!({"volume": 60})),
        );
        let ack = client.send_action(PlayerAction::VolumeUp).await.unwrap();
        assert_eq!(ack.volume, Some(60));
    }

    #[tokio::test]
    async fn test_gesture_ignores_body() {
        let backend = FakeBackend::new()
            .with_json("/api/gesture/start", json!({"status": "gesture started"}))
            .with_json("/api/gesture/stop", json!("anything"));
        let requests = backend.requests();
        let client = PlayerClient::with_backend(backend);

        client.set_gesture(true).await.unwrap();
        client.set_gesture(false).await.unwrap();

        let paths: Vec<String> = requests.lock().iter().map(|r| r.path.clone()).collect();
        assert_eq!(paths, vec!["/api/gesture/start", "/api/gesture/stop"]);
    }
}
