//! Protocol error types.

use thiserror::Error;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while encoding or decoding channel messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The envelope itself is not valid JSON or lacks an event name.
    #[error("invalid envelope: {0}")]
    InvalidEnvelope(String),

    /// Envelope could not be serialized.
    #[error("encode failed: {0}")]
    Encode(String),

    /// Event requires a payload but none was sent.
    #[error("missing payload for '{event}'")]
    MissingPayload {
        /// Event name.
        event: &'static str,
    },

    /// Payload is present but does not match the event's shape.
    #[error("malformed payload for '{event}': {reason}")]
    MalformedPayload {
        /// Event name.
        event: &'static str,
        /// Decoder message.
        reason: String,
    },

    /// Event name is not part of the protocol.
    #[error("unknown event '{0}'")]
    UnknownEvent(String),
}
