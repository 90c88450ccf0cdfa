//! Single-channel manager.
//!
//! The viewer holds exactly one channel for its whole lifetime. The manager
//! enforces that, owns the event-name → decoder table, and encodes outbound
//! events. It performs no I/O; a transport moves the resulting envelopes.
//!
//! # Invariants
//!
//! - Single Open: `open()` succeeds at most once. The transport beneath may
//!   reconnect any number of times, but that is still the same channel.
//! - Emit After Open: outbound events are only encoded for an open channel.
//! - Subscribed Only: inbound names without a subscription are dropped, never
//!   delivered.

use std::collections::HashMap;

use facewatch_proto::{Decoder, Envelope, InboundEvent, OutboundEvent, envelope::Value, names};

use crate::{ChannelError, ChannelEvent, Delivery};

/// Lifecycle of the managed channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// Not yet opened.
    Closed,
    /// Opened. Never returns to `Closed`.
    Open,
}

/// Owns the single channel and its subscription table.
#[derive(Debug, Clone)]
pub struct ChannelManager {
    state: ChannelState,
    subscriptions: HashMap<&'static str, Decoder>,
}

impl Default for ChannelManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelManager {
    /// Create a closed manager with no subscriptions.
    pub fn new() -> Self {
        Self { state: ChannelState::Closed, subscriptions: HashMap::new() }
    }

    /// Open the channel.
    ///
    /// # Errors
    ///
    /// - `ChannelError::AlreadyOpen` on every call after the first
    pub fn open(&mut self) -> Result<(), ChannelError> {
        if self.state == ChannelState::Open {
            return Err(ChannelError::AlreadyOpen);
        }
        self.state = ChannelState::Open;
        tracing::debug!("channel opened");
        Ok(())
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ChannelState {
        self.state
    }

    /// Whether `open()` has succeeded.
    pub fn is_open(&self) -> bool {
        self.state == ChannelState::Open
    }

    /// Route events named `name` to `decoder`. Replaces an earlier
    /// subscription for the same name.
    pub fn subscribe(&mut self, name: &'static str, decoder: Decoder) {
        self.subscriptions.insert(name, decoder);
    }

    /// Subscribe every inbound event the protocol defines.
    pub fn subscribe_all(&mut self) {
        for (name, decoder) in InboundEvent::SUBSCRIPTIONS {
            self.subscribe(name, decoder);
        }
    }

    /// Whether `name` has a subscriber.
    pub fn is_subscribed(&self, name: &str) -> bool {
        self.subscriptions.contains_key(name)
    }

    /// Encode an outbound event for sending.
    ///
    /// # Errors
    ///
    /// - `ChannelError::NotOpen` before `open()`
    /// - `ChannelError::Protocol` if the payload cannot be serialized
    pub fn emit(&self, event: OutboundEvent) -> Result<Envelope, ChannelError> {
        if !self.is_open() {
            return Err(ChannelError::NotOpen);
        }
        Ok(event.into_envelope()?)
    }

    /// Route a transport notification through the subscription table.
    ///
    /// A transport-level connect is delivered as the `connect` event when
    /// something subscribed to it.
    ///
    /// # Errors
    ///
    /// - `ChannelError::Protocol` when a subscribed event's payload is
    ///   malformed. The error concerns only this event.
    pub fn receive(&self, event: ChannelEvent) -> Result<Delivery, ChannelError> {
        match event {
            ChannelEvent::Connected => self.route(names::CONNECT, None),
            ChannelEvent::Disconnected { reason } => Ok(Delivery::Disconnected { reason }),
            ChannelEvent::Message(envelope) => {
                let Envelope { event, data } = envelope;
                match self.subscriptions.get_key_value(event.as_str()) {
                    Some((name, _)) => self.route(*name, data),
                    None => {
                        tracing::trace!(event = %event, "no subscriber, dropping");
                        Ok(Delivery::Ignored)
                    },
                }
            },
        }
    }

    fn route(&self, name: &'static str, data: Option<Value>) -> Result<Delivery, ChannelError> {
        match self.subscriptions.get(name) {
            Some(decoder) => Ok(Delivery::Event(decoder(data)?)),
            None => Ok(Delivery::Ignored),
        }
    }
}
