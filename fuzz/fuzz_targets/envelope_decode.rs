//! Fuzz target for Envelope::decode and per-event payload decoding
//!
//! This fuzzer feeds arbitrary text to the envelope parser and, for every
//! envelope that parses, tries both event directions to find:
//! - Parser crashes or panics
//! - Payload type confusion (wrong shape for a known event name)
//! - Deeply nested or oversized JSON values
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error.

#![no_main]

use facewatch_proto::{Envelope, InboundEvent, OutboundEvent};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let Ok(envelope) = Envelope::decode(text) else {
        return;
    };

    // Anything that decodes must re-encode
    if let Ok(event) = InboundEvent::decode(envelope.clone()) {
        let reencoded = event.into_envelope().expect("decoded event re-encodes");
        assert_eq!(reencoded.event, envelope.event);
    }
    let _ = OutboundEvent::decode(envelope);
});
