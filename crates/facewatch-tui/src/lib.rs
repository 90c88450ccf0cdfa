//! Terminal viewer for Facewatch
//!
//! A thin shell over [`facewatch_app::Driver`] that provides terminal-specific
//! I/O. All session logic lives in the generic [`facewatch_app::Runtime`].
//!
//! This crate handles terminal rendering, the WebSocket or simulated channel,
//! and the in-process stream server used when no server address is given.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod server;
pub mod terminal;
pub mod ui;

pub use facewatch_app::{App, AppAction, AppEvent, Bridge, Driver, KeyInput, Runtime};
pub use server::{ServerHandle, SimulationConfig, spawn_server};
pub use terminal::{ConnectionMode, TerminalDriver, TerminalError};
