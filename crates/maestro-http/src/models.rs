//! Wire shapes specific to the HTTP transport.

use maestro_core::CommandAck;
use serde::{Deserialize, Serialize};

/// Body of `GET /api/songs`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SongsResponse {
    #[serde(default)]
    pub songs: Vec<String>,
}

/// Body of `POST /api/play_index`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PlayIndexRequest {
    pub index: usize,
}

/// Command response: either authoritative fields or an `error` message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AckBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(flatten)]
    pub ack: CommandAck,
}

/// Error body returned alongside 4xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Best-effort message extraction from a non-success body.
pub fn rejection_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body).map_or_else(
        |_| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "request rejected".to_string()
            } else {
                trimmed.to_string()
            }
        },
        |parsed| parsed.error,
    )
}
