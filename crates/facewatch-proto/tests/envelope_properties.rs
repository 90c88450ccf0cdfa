//! Property-based tests for envelope and event decoding.
//!
//! Decoding runs on untrusted server input, so it must reject rather than
//! panic, and per-event failures must stay per-event.

use facewatch_proto::{
    Envelope, InboundEvent, OutboundEvent, ProtocolError,
    payloads::{ChatMessage, ClientInfo, ClientUpdate},
};
use proptest::prelude::*;
use serde_json::json;

proptest! {
    #[test]
    fn prop_decode_never_panics(text in ".*") {
        if let Ok(envelope) = Envelope::decode(&text) {
            let _ = InboundEvent::decode(envelope);
        }
    }

    #[test]
    fn prop_chat_text_survives_the_wire(username in ".*", message in ".*") {
        let sent = OutboundEvent::ChatMessage(ChatMessage {
            username: username.clone(),
            message: message.clone(),
        });
        let text = sent.into_envelope().and_then(|e| e.encode());
        prop_assert!(text.is_ok());

        let received = text
            .and_then(|t| Envelope::decode(&t))
            .and_then(InboundEvent::decode);
        prop_assert_eq!(
            received,
            Ok(InboundEvent::ChatMessage(ChatMessage { username, message }))
        );
    }

    #[test]
    fn prop_roster_order_is_preserved(names in prop::collection::vec("[a-z]{0,8}", 0..20)) {
        let clients: Vec<ClientInfo> = names
            .iter()
            .map(|n| ClientInfo { username: Some(n.clone()), ..ClientInfo::default() })
            .collect();
        let update = ClientUpdate { count: clients.len() as u32, clients };

        let envelope = InboundEvent::ClientUpdate(update.clone()).into_envelope();
        prop_assert!(envelope.is_ok());
        let decoded = envelope.and_then(InboundEvent::decode);
        prop_assert_eq!(decoded, Ok(InboundEvent::ClientUpdate(update)));
    }
}

#[test]
fn wrong_payload_type_fails_only_that_event() {
    let bad = Envelope::new("client_update", Some(json!({"count": "many", "clients": []})));
    let good = Envelope::new("chat_message", Some(json!({"username": "a", "message": "b"})));

    assert!(matches!(
        InboundEvent::decode(bad),
        Err(ProtocolError::MalformedPayload { event: "client_update", .. })
    ));
    assert!(InboundEvent::decode(good).is_ok());
}

#[test]
fn server_only_names_are_not_inbound() {
    let result = InboundEvent::decode(Envelope::bare("start_recording"));
    assert_eq!(result, Err(ProtocolError::UnknownEvent("start_recording".into())));
}
