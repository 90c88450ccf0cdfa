//! Typed event payloads.
//!
//! Field names match the JSON keys on the wire. Optional fields default when
//! absent so that older or newer servers can add or drop them without breaking
//! decoding; required fields fail the event.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status string carried by `recording_status` when a recording began.
pub const RECORDING_STARTED: &str = "started";

/// Status string carried by `recording_status` when a recording ended.
pub const RECORDING_STOPPED: &str = "stopped";

/// Presence announcement sent after every connect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserJoined {
    /// Display name chosen at the identity gate.
    pub username: String,
}

/// A processed video frame with its detection result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedFrame {
    /// Encoded image, typically a `data:image/jpeg;base64,...` URL. Opaque to
    /// the viewer.
    pub frame: String,

    /// Number of faces detected in this frame.
    pub num_faces: u32,

    /// Connected client count at the time the frame was broadcast.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_count: Option<u32>,
}

/// One connected viewer as reported by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    /// Server-side connection ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Display name. `None` or empty for viewers that have not announced one.
    #[serde(default)]
    pub username: Option<String>,

    /// Connection time, already formatted for presentation.
    #[serde(default)]
    pub connected_at: Option<String>,
}

/// Full viewer roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientUpdate {
    /// Total viewer count as reported by the server.
    pub count: u32,

    /// Viewers in presentation order.
    pub clients: Vec<ClientInfo>,
}

/// A chat line, in either direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author display name.
    pub username: String,

    /// Message body.
    pub message: String,
}

/// Recording lifecycle notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingStatus {
    /// `"started"` or `"stopped"`. Anything other than the string
    /// `"started"`, including an absent or non-string value, means stopped.
    #[serde(default)]
    pub status: Option<Value>,

    /// Output file name, sent with `"started"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl RecordingStatus {
    /// Notification for a recording that started writing to `filename`.
    pub fn started(filename: impl Into<String>) -> Self {
        Self {
            status: Some(Value::String(RECORDING_STARTED.into())),
            filename: Some(filename.into()),
        }
    }

    /// Notification for a recording that stopped.
    pub fn stopped() -> Self {
        Self { status: Some(Value::String(RECORDING_STOPPED.into())), filename: None }
    }

    /// Whether this notification reports an active recording.
    pub fn is_started(&self) -> bool {
        matches!(&self.status, Some(Value::String(s)) if s == RECORDING_STARTED)
    }
}
