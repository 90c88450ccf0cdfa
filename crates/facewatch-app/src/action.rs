//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use facewatch_proto::OutboundEvent;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Open the session channel. Produced once, when the identity gate is
    /// passed.
    OpenChannel,

    /// Send an event over the channel. Fire-and-forget.
    Emit(OutboundEvent),
}
