//! Transport notifications and their decoded deliveries.

use facewatch_proto::{Envelope, InboundEvent};

/// Notifications a transport feeds into the channel manager.
///
/// Transports report connection lifecycle alongside messages so the manager can
/// surface a reconnect as the `connect` event, the same way the server's own
/// events arrive.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// The underlying connection was established (initially or after a
    /// reconnect).
    Connected,

    /// The underlying connection was lost. The transport may reconnect.
    Disconnected {
        /// Human-readable cause.
        reason: String,
    },

    /// A message arrived from the server.
    Message(Envelope),
}

/// Result of routing a [`ChannelEvent`] through the subscription table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// A subscribed event with a well-formed payload.
    Event(InboundEvent),

    /// The connection dropped.
    Disconnected {
        /// Human-readable cause.
        reason: String,
    },

    /// No subscriber for this event name.
    Ignored,
}
