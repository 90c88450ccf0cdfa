//! Facewatch wire protocol
//!
//! Named events exchanged between a viewer and the stream server over a single
//! persistent channel. Every message is a JSON [`Envelope`] carrying an event
//! name and an optional payload:
//!
//! ```text
//! {"event": "chat_message", "data": {"username": "alice", "message": "hi"}}
//! ```
//!
//! # Directions
//!
//! - [`InboundEvent`]: server → viewer (`processed_frame`, `client_update`,
//!   `chat_message`, `recording_status`) plus the transport-generated
//!   `connect`.
//! - [`OutboundEvent`]: viewer → server (`user_joined`, `toggle_processing`,
//!   `start_recording`, `stop_recording`, `chat_message`).
//!
//! Payload decoding is per event: a malformed payload fails only that event
//! with a [`ProtocolError`], never the envelope stream around it.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod envelope;
pub mod errors;
pub mod events;
pub mod payloads;

pub use envelope::Envelope;
pub use errors::{ProtocolError, Result};
pub use events::{Decoder, InboundEvent, OutboundEvent, names};
