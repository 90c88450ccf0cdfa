//! Channel-to-Application translation layer.
//!
//! The [`Bridge`] wraps the Sans-IO [`facewatch_client::ChannelManager`] and
//! adapts it to the application lifecycle.
//!
//! # Responsibilities
//!
//! - Opens the single channel when the App asks for it.
//! - Converts [`crate::AppAction::Emit`] into wire envelopes and accumulates
//!   them to be sent by the driver in the next I/O cycle.
//! - Routes transport notifications through the subscription table and turns
//!   the deliveries into [`crate::AppEvent`]s.
//! - Logs and skips events with malformed payloads so one bad event never
//!   takes the channel down.

use facewatch_client::{ChannelError, ChannelEvent, ChannelManager, Delivery, Envelope};

use crate::{AppAction, AppEvent};

/// Bridge between App and the channel manager.
#[derive(Debug)]
pub struct Bridge {
    channel: ChannelManager,
    outgoing: Vec<Envelope>,
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new()
    }
}

impl Bridge {
    /// Create a bridge subscribed to every inbound event the App handles.
    pub fn new() -> Self {
        let mut channel = ChannelManager::new();
        channel.subscribe_all();
        Self { channel, outgoing: Vec::new() }
    }

    /// Underlying channel manager.
    pub fn channel(&self) -> &ChannelManager {
        &self.channel
    }

    /// Process an App action and return resulting App events.
    pub fn process_app_action(&mut self, action: AppAction) -> Vec<AppEvent> {
        match action {
            AppAction::OpenChannel => match self.channel.open() {
                Ok(()) => vec![AppEvent::Connecting],
                Err(e) => {
                    tracing::warn!(error = %e, "refusing to open channel");
                    vec![]
                },
            },
            AppAction::Emit(event) => {
                let name = event.name();
                match self.channel.emit(event) {
                    Ok(envelope) => {
                        tracing::debug!(event = name, "queued outbound event");
                        self.outgoing.push(envelope);
                    },
                    Err(e) => tracing::warn!(event = name, error = %e, "dropping outbound event"),
                }
                vec![]
            },
            AppAction::Render | AppAction::Quit => vec![],
        }
    }

    /// Handle a notification from the transport.
    pub fn handle_channel_event(&mut self, event: ChannelEvent) -> Vec<AppEvent> {
        match self.channel.receive(event) {
            Ok(Delivery::Event(event)) => vec![AppEvent::Inbound(event)],
            Ok(Delivery::Disconnected { reason }) => vec![AppEvent::Disconnected { reason }],
            Ok(Delivery::Ignored) => vec![],
            Err(ChannelError::Protocol(e)) => {
                tracing::warn!(error = %e, "skipping malformed event");
                vec![]
            },
            Err(e) => {
                tracing::warn!(error = %e, "channel rejected event");
                vec![]
            },
        }
    }

    /// Take pending outgoing envelopes.
    pub fn take_outgoing(&mut self) -> Vec<Envelope> {
        std::mem::take(&mut self.outgoing)
    }
}
