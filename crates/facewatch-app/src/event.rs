//! Application input events.
//!
//! This module defines [`AppEvent`], the comprehensive set of inputs that drive
//! the [`crate::App`] state machine.
//!
//! Events originate from three distinct sources:
//! - User interactions (Keyboard, Resize) and system ticks.
//! - Channel notifications, decoded by the [`crate::Bridge`].
//! - Local optimistic changes raised by the command dispatcher, so that even
//!   those reach the view model through the synchronizer.

use facewatch_proto::InboundEvent;

use crate::KeyInput;

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Keyboard input.
    Key(KeyInput),

    /// Periodic tick.
    Tick,

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// Channel is being opened.
    Connecting,

    /// Transport lost the connection. It may reconnect on its own.
    Disconnected {
        /// Human-readable cause.
        reason: String,
    },

    /// Server event, in arrival order.
    Inbound(InboundEvent),

    /// Detection toggle changed locally, before any server confirmation.
    DetectionToggled {
        /// New toggle value.
        enabled: bool,
    },
}
