//! Session controller for Facewatch stream viewers
//!
//! Pure state machines and a generic runtime for one viewer's session: the
//! identity gate, the event synchronizer feeding the view model, the command
//! dispatcher and the chat relay. The same code runs in the terminal frontend
//! and in deterministic tests.
//!
//! # Components
//!
//! - [`App`]: session state machine (gate, synchronizer, dispatcher, key
//!   routing)
//! - [`ViewModel`]: everything a renderer needs, written only by [`App`]
//! - [`Bridge`]: channel bridge (translates App actions to envelopes and
//!   channel notifications to App events)
//! - [`Driver`]: Trait for platform-specific I/O abstraction
//! - [`Runtime`]: Generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod bridge;
pub mod chat;
mod driver;
mod event;
mod gate;
mod input;
mod runtime;
mod state;

pub use action::AppAction;
pub use app::{App, START_RECORDING_KEY, STOP_RECORDING_KEY, TOGGLE_DETECTION_KEY};
pub use bridge::Bridge;
pub use chat::{ChatMessage, ChatTranscript};
pub use driver::Driver;
pub use event::AppEvent;
pub use gate::{IdentityGate, Session};
pub use input::{KeyInput, TextInput};
pub use runtime::Runtime;
pub use state::{
    ConnectionState, RecordingControls, RecordingState, StreamFrame, ViewModel, ViewerEntry,
    ViewerRoster,
};
