//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. The channel is either a
//! WebSocket to a real stream server or the in-process simulated server.

use std::io::{self, Stdout, stdout};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use facewatch_app::{App, AppEvent, Driver, KeyInput};
use facewatch_client::{
    ChannelEvent, Envelope,
    transport::{self, ConnectedClient, TransportConfig, TransportError},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{
    server::{self, ServerHandle, SimulationConfig},
    ui,
};

/// Idle wait for input before a tick is reported.
const TICK: tokio::time::Duration = tokio::time::Duration::from_millis(50);

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Channel send error.
    #[error("channel send error")]
    ChannelSend,
}

/// Where the channel goes.
#[derive(Debug, Clone)]
pub enum ConnectionMode {
    /// Spawn the in-process simulated server on connect.
    Simulation(SimulationConfig),
    /// Connect to a stream server over WebSocket.
    WebSocket(TransportConfig),
}

/// Live channel (either in-process or WebSocket).
enum Connection {
    /// In-process simulated server.
    InProcess(ServerHandle),
    /// WebSocket connection to a remote server.
    WebSocket(ConnectedClient),
}

impl Connection {
    fn to_server(&self) -> &mpsc::Sender<Envelope> {
        match self {
            Connection::InProcess(h) => &h.to_server,
            Connection::WebSocket(h) => &h.to_server,
        }
    }

    fn from_server(&mut self) -> &mut mpsc::Receiver<ChannelEvent> {
        match self {
            Connection::InProcess(h) => &mut h.from_server,
            Connection::WebSocket(h) => &mut h.from_server,
        }
    }

    fn stop(&self) {
        match self {
            Connection::InProcess(h) => h.stop(),
            Connection::WebSocket(h) => h.stop(),
        }
    }
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Handles terminal I/O (crossterm), rendering (ratatui), and the channel
/// (tokio-tungstenite or the simulated server).
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    connection: Option<Connection>,
    mode: ConnectionMode,
}

impl TerminalDriver {
    /// Create a new terminal driver and switch the terminal to raw mode.
    pub fn new(mode: ConnectionMode) -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        let event_stream = EventStream::new();

        Ok(Self { terminal, event_stream, connection: None, mode })
    }

    /// Convert a crossterm key event to `KeyInput`.
    fn convert_key(event: KeyEvent) -> Option<KeyInput> {
        if event.modifiers.contains(KeyModifiers::CONTROL) && event.code == KeyCode::Char('c') {
            return Some(KeyInput::Esc);
        }

        match event.code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Up => Some(KeyInput::Up),
            KeyCode::Down => Some(KeyInput::Down),
            KeyCode::PageUp => Some(KeyInput::PageUp),
            KeyCode::PageDown => Some(KeyInput::PageDown),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            KeyCode::F(n) => Some(KeyInput::F(n)),
            _ => None,
        }
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        tokio::select! {
            biased;

            // Terminal events
            maybe_event = self.event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) if key_event.kind == KeyEventKind::Press => {
                        Ok(Self::convert_key(key_event).map(AppEvent::Key))
                    },
                    Some(Ok(Event::Resize(cols, rows))) => Ok(Some(AppEvent::Resize(cols, rows))),
                    Some(Err(e)) => Err(TerminalError::Io(e)),
                    _ => Ok(None),
                }
            }

            // Tick timeout
            () = tokio::time::sleep(TICK) => Ok(Some(AppEvent::Tick)),
        }
    }

    async fn send(&mut self, envelope: Envelope) -> Result<(), Self::Error> {
        if let Some(conn) = &self.connection {
            conn.to_server().send(envelope).await.map_err(|_| TerminalError::ChannelSend)?;
        }
        Ok(())
    }

    async fn recv(&mut self) -> Option<ChannelEvent> {
        self.connection.as_mut().and_then(|conn| conn.from_server().try_recv().ok())
    }

    async fn connect(&mut self, addr: &str) -> Result<(), Self::Error> {
        let connection = match &self.mode {
            ConnectionMode::Simulation(config) => {
                tracing::info!("starting simulated stream server");
                Connection::InProcess(server::spawn_server(config.clone()))
            },
            ConnectionMode::WebSocket(config) => {
                Connection::WebSocket(transport::connect_with_config(addr, config.clone()).await?)
            },
        };
        self.connection = Some(connection);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| {
            ui::render(frame, app);
        })?;
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(ref conn) = self.connection {
            conn.stop();
        }
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.stop();
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}
