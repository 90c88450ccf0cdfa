//! JSON envelope framing.
//!
//! One WebSocket text message carries exactly one [`Envelope`]. The payload is
//! kept as an untyped [`serde_json::Value`] so the envelope can be parsed
//! without knowing the event; typed decoding happens per event in
//! [`crate::events`].

use serde::{Deserialize, Serialize};
pub use serde_json::Value;

use crate::errors::{ProtocolError, Result};

/// A named event with an optional payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Event name.
    pub event: String,

    /// Event payload. Absent for payload-less events such as
    /// `start_recording`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Envelope {
    /// Create an envelope.
    pub fn new(event: impl Into<String>, data: Option<Value>) -> Self {
        Self { event: event.into(), data }
    }

    /// Envelope without a payload.
    pub fn bare(event: impl Into<String>) -> Self {
        Self::new(event, None)
    }

    /// Serialize to a JSON text message.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Encode(e.to_string()))
    }

    /// Parse a JSON text message.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::InvalidEnvelope` if the text is not JSON or the event
    ///   name is missing.
    pub fn decode(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ProtocolError::InvalidEnvelope(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn bare_envelope_omits_data() {
        let text = Envelope::bare("start_recording").encode().expect("encode");
        assert_eq!(text, r#"{"event":"start_recording"}"#);
    }

    #[test]
    fn null_data_decodes_as_absent() {
        let envelope = Envelope::decode(r#"{"event":"connect","data":null}"#).expect("decode");
        assert_eq!(envelope, Envelope::bare("connect"));
    }

    #[test]
    fn false_payload_is_kept() {
        let envelope = Envelope::new("toggle_processing", Some(json!(false)));
        let decoded = Envelope::decode(&envelope.encode().expect("encode")).expect("decode");
        assert_eq!(decoded.data, Some(json!(false)));
    }

    #[test]
    fn missing_event_name_is_rejected() {
        let result = Envelope::decode(r#"{"data":{"count":1}}"#);
        assert!(matches!(result, Err(ProtocolError::InvalidEnvelope(_))));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(Envelope::decode("not json").is_err());
    }
}
