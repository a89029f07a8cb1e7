//! Playback backend port.
//!
//! # Design Rules
//!
//! - DTOs here are transport-agnostic shapes of the backend contract; the
//!   HTTP adapter owns the wire details (paths, headers, error bodies).
//! - Every DTO field is optional. The backend omits fields freely and the
//!   client only overwrites what it was told.
//! - `PlayerApi` is object safe so components can share one
//!   `Arc<dyn PlayerApi>`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{PlaybackMode, PlaybackStatus, PlayerAction, StatePatch};

// ── DTOs ─────────────────────────────────────────────────────────────────────

/// Server truth as reported by `GET /api/state`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerState {
    #[serde(default)]
    pub current_index: Option<usize>,
    #[serde(default)]
    pub status: Option<PlaybackStatus>,
    #[serde(default)]
    pub mode: Option<PlaybackMode>,
    #[serde(default)]
    pub likes: Option<u64>,
    #[serde(default)]
    pub dislikes: Option<u64>,
    /// Whether the gesture service is running.
    #[serde(default)]
    pub gesture: Option<bool>,
}

impl ServerState {
    /// Patch overwriting every field the server reported.
    pub fn to_patch(&self) -> StatePatch {
        StatePatch {
            current_index: self.current_index,
            status: self.status,
            mode: self.mode,
            likes: self.likes,
            dislikes: self.dislikes,
            gesture_active: self.gesture,
            ..StatePatch::default()
        }
    }
}

/// Authoritative fields returned by a successful command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandAck {
    #[serde(default)]
    pub status: Option<PlaybackStatus>,
    #[serde(default)]
    pub current_index: Option<usize>,
    #[serde(default)]
    pub likes: Option<u64>,
    #[serde(default)]
    pub dislikes: Option<u64>,
    #[serde(default)]
    pub volume: Option<u8>,
}

impl CommandAck {
    pub fn to_patch(&self) -> StatePatch {
        StatePatch {
            status: self.status,
            current_index: self.current_index,
            likes: self.likes,
            dislikes: self.dislikes,
            volume: self.volume,
            ..StatePatch::default()
        }
    }
}

// ── Error ─────────────────────────────────────────────────────────────────────

/// Errors returned by [`PlayerApi`] operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlayerPortError {
    /// The request never produced a usable HTTP response.
    #[error("Network error: {message}")]
    Network { message: String },

    /// The backend explicitly refused the request.
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Missing or invalid bearer token.
    #[error("Not authorized")]
    Unauthorized,

    /// The backend failed on its side (5xx).
    #[error("Server error ({status})")]
    Server { status: u16 },

    /// The response body did not match the contract.
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    /// The client is misconfigured (e.g. unusable base URL).
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl PlayerPortError {
    /// Whether the backend definitively did not apply the request.
    ///
    /// Network failures and server errors leave the outcome unknown.
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::Unauthorized)
    }
}

/// Result alias for port operations.
pub type PlayerPortResult<T> = Result<T, PlayerPortError>;

// ── Port ──────────────────────────────────────────────────────────────────────

/// The remote playback service.
#[async_trait]
pub trait PlayerApi: Send + Sync {
    /// `GET /api/state`.
    async fn fetch_state(&self) -> PlayerPortResult<ServerState>;

    /// `GET /api/songs`.
    async fn fetch_songs(&self) -> PlayerPortResult<Vec<String>>;

    /// `POST` to one of the plain action endpoints.
    async fn send_action(&self, action: PlayerAction) -> PlayerPortResult<CommandAck>;

    /// `POST /api/play_index`.
    async fn play_index(&self, index: usize) -> PlayerPortResult<CommandAck>;

    /// `POST /api/gesture/start` or `/api/gesture/stop`. The body is ignored.
    async fn set_gesture(&self, active: bool) -> PlayerPortResult<()>;
}
