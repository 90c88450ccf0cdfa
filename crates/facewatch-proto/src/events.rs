//! Typed inbound and outbound events.
//!
//! # Invariants
//!
//! - Name Uniqueness: each variant maps to exactly one event name through an
//!   exhaustive `match`; adding a variant fails compilation until the name,
//!   encoder and decoder are all provided.
//! - Payload Isolation: decoding one event never depends on another event's
//!   shape, so a malformed payload only invalidates its own event.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    Envelope,
    errors::{ProtocolError, Result},
    payloads::{ChatMessage, ClientUpdate, ProcessedFrame, RecordingStatus, UserJoined},
};

/// Event names as they appear on the wire.
pub mod names {
    /// Channel (re)connected. Generated by the transport, not the server.
    pub const CONNECT: &str = "connect";
    /// Processed frame with face count.
    pub const PROCESSED_FRAME: &str = "processed_frame";
    /// Viewer roster replacement.
    pub const CLIENT_UPDATE: &str = "client_update";
    /// Chat line (both directions).
    pub const CHAT_MESSAGE: &str = "chat_message";
    /// Recording started or stopped.
    pub const RECORDING_STATUS: &str = "recording_status";
    /// Presence announcement.
    pub const USER_JOINED: &str = "user_joined";
    /// Detection on/off request.
    pub const TOGGLE_PROCESSING: &str = "toggle_processing";
    /// Recording start request.
    pub const START_RECORDING: &str = "start_recording";
    /// Recording stop request.
    pub const STOP_RECORDING: &str = "stop_recording";
}

/// Payload decoder registered for one inbound event name.
pub type Decoder = fn(Option<Value>) -> Result<InboundEvent>;

/// Events delivered to the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// The channel is (re)connected.
    Connect,
    /// New frame and face count.
    ProcessedFrame(ProcessedFrame),
    /// Complete viewer roster.
    ClientUpdate(ClientUpdate),
    /// Chat line from any participant, including our own echo.
    ChatMessage(ChatMessage),
    /// Recording lifecycle change.
    RecordingStatus(RecordingStatus),
}

impl InboundEvent {
    /// All inbound event names with their payload decoders.
    pub const SUBSCRIPTIONS: [(&'static str, Decoder); 5] = [
        (names::CONNECT, Self::decode_connect),
        (names::PROCESSED_FRAME, Self::decode_processed_frame),
        (names::CLIENT_UPDATE, Self::decode_client_update),
        (names::CHAT_MESSAGE, Self::decode_chat_message),
        (names::RECORDING_STATUS, Self::decode_recording_status),
    ];

    /// Wire name of this event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Connect => names::CONNECT,
            Self::ProcessedFrame(_) => names::PROCESSED_FRAME,
            Self::ClientUpdate(_) => names::CLIENT_UPDATE,
            Self::ChatMessage(_) => names::CHAT_MESSAGE,
            Self::RecordingStatus(_) => names::RECORDING_STATUS,
        }
    }

    /// Decoder for an inbound event name. `None` for names the viewer does not
    /// consume.
    pub fn decoder(name: &str) -> Option<Decoder> {
        Self::SUBSCRIPTIONS.iter().find(|(n, _)| *n == name).map(|(_, d)| *d)
    }

    /// Decode an envelope into a typed event.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::UnknownEvent` if the name is not an inbound event
    /// - `ProtocolError::MissingPayload` / `MalformedPayload` if the payload
    ///   does not match the event
    pub fn decode(envelope: Envelope) -> Result<Self> {
        let decoder = Self::decoder(&envelope.event)
            .ok_or_else(|| ProtocolError::UnknownEvent(envelope.event.clone()))?;
        decoder(envelope.data)
    }

    /// Encode into an envelope. Used by servers and test fixtures.
    pub fn into_envelope(self) -> Result<Envelope> {
        let name = self.name();
        let data = match self {
            Self::Connect => None,
            Self::ProcessedFrame(p) => Some(to_value(name, &p)?),
            Self::ClientUpdate(p) => Some(to_value(name, &p)?),
            Self::ChatMessage(p) => Some(to_value(name, &p)?),
            Self::RecordingStatus(p) => Some(to_value(name, &p)?),
        };
        Ok(Envelope::new(name, data))
    }

    fn decode_connect(_data: Option<Value>) -> Result<Self> {
        Ok(Self::Connect)
    }

    fn decode_processed_frame(data: Option<Value>) -> Result<Self> {
        payload(names::PROCESSED_FRAME, data).map(Self::ProcessedFrame)
    }

    fn decode_client_update(data: Option<Value>) -> Result<Self> {
        payload(names::CLIENT_UPDATE, data).map(Self::ClientUpdate)
    }

    fn decode_chat_message(data: Option<Value>) -> Result<Self> {
        payload(names::CHAT_MESSAGE, data).map(Self::ChatMessage)
    }

    fn decode_recording_status(data: Option<Value>) -> Result<Self> {
        payload(names::RECORDING_STATUS, data).map(Self::RecordingStatus)
    }
}

/// Events sent by the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent {
    /// Announce presence under a display name.
    UserJoined(UserJoined),
    /// Request detection on (`true`) or off (`false`).
    ToggleProcessing(bool),
    /// Request recording start.
    StartRecording,
    /// Request recording stop.
    StopRecording,
    /// Send a chat line.
    ChatMessage(ChatMessage),
}

impl OutboundEvent {
    /// Wire name of this event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::UserJoined(_) => names::USER_JOINED,
            Self::ToggleProcessing(_) => names::TOGGLE_PROCESSING,
            Self::StartRecording => names::START_RECORDING,
            Self::StopRecording => names::STOP_RECORDING,
            Self::ChatMessage(_) => names::CHAT_MESSAGE,
        }
    }

    /// Encode into an envelope.
    pub fn into_envelope(self) -> Result<Envelope> {
        let name = self.name();
        let data = match self {
            Self::UserJoined(p) => Some(to_value(name, &p)?),
            Self::ToggleProcessing(enabled) => Some(Value::Bool(enabled)),
            Self::StartRecording | Self::StopRecording => None,
            Self::ChatMessage(p) => Some(to_value(name, &p)?),
        };
        Ok(Envelope::new(name, data))
    }

    /// Decode an envelope sent by a viewer. Used by servers and test fixtures.
    pub fn decode(envelope: Envelope) -> Result<Self> {
        match envelope.event.as_str() {
            names::USER_JOINED => payload(names::USER_JOINED, envelope.data).map(Self::UserJoined),
            names::TOGGLE_PROCESSING => {
                payload(names::TOGGLE_PROCESSING, envelope.data).map(Self::ToggleProcessing)
            },
            names::START_RECORDING => Ok(Self::StartRecording),
            names::STOP_RECORDING => Ok(Self::StopRecording),
            names::CHAT_MESSAGE => {
                payload(names::CHAT_MESSAGE, envelope.data).map(Self::ChatMessage)
            },
            _ => Err(ProtocolError::UnknownEvent(envelope.event)),
        }
    }
}

fn payload<T: DeserializeOwned>(event: &'static str, data: Option<Value>) -> Result<T> {
    let data = data.ok_or(ProtocolError::MissingPayload { event })?;
    serde_json::from_value(data)
        .map_err(|e| ProtocolError::MalformedPayload { event, reason: e.to_string() })
}

fn to_value<T: Serialize>(event: &'static str, payload: &T) -> Result<Value> {
    serde_json::to_value(payload).map_err(|e| ProtocolError::Encode(format!("{event}: {e}")))
}
