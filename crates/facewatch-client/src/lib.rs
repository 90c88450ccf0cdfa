//! Client channel layer
//!
//! Owns the viewer's single persistent channel to the stream server. The
//! [`ChannelManager`] is Sans-IO: it tracks whether the channel was opened,
//! maps inbound event names to payload decoders, and turns outbound events
//! into envelopes. Moving bytes is left to a transport.
//!
//! # Components
//!
//! - [`ChannelManager`]: single-open guard, subscription table, emit encoding
//! - [`ChannelEvent`]: notifications a transport feeds into the manager
//! - [`Delivery`]: what the manager hands back for each notification
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides:
//! - [`transport::ConnectedClient`]: WebSocket channel with automatic
//!   reconnection
//! - [`transport::connect`]: Start the channel to a server URL

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod channel;
mod error;
mod event;

#[cfg(feature = "transport")]
pub mod transport;

pub use channel::{ChannelManager, ChannelState};
pub use error::ChannelError;
pub use event::{ChannelEvent, Delivery};
pub use facewatch_proto::{Envelope, InboundEvent, OutboundEvent};
