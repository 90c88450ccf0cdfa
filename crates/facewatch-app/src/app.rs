//! Application state machine.
//!
//! This module defines the [`App`] state machine, which manages the viewer's
//! session completely decoupled from I/O and protocol mechanics.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Runs the identity gate and requests the channel exactly once.
//! - Applies inbound server events to the [`ViewModel`] in arrival order (the
//!   event synchronizer). [`App::handle`] is the view model's only writer.
//! - Turns user intents into outbound events (the command dispatcher).
//! - Routes keyboard input to the gate, the chat field or a command.

use facewatch_proto::{
    InboundEvent, OutboundEvent,
    payloads::{ChatMessage, ProcessedFrame, RecordingStatus, UserJoined},
};

use crate::{
    AppAction, AppEvent, ChatTranscript, ConnectionState, IdentityGate, KeyInput, RecordingState,
    Session, StreamFrame, TextInput, ViewModel, ViewerRoster, chat::notices,
};

/// Lines scrolled by `PageUp`/`PageDown` in the transcript.
const PAGE_LINES: usize = 10;

/// Function key toggling detection.
pub const TOGGLE_DETECTION_KEY: KeyInput = KeyInput::F(1);
/// Function key requesting a recording start.
pub const START_RECORDING_KEY: KeyInput = KeyInput::F(2);
/// Function key requesting a recording stop.
pub const STOP_RECORDING_KEY: KeyInput = KeyInput::F(3);

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    /// Server address for connection.
    server_addr: String,
    /// Username entry. Passed at most once.
    gate: IdentityGate,
    /// Participant identity. `None` until the gate is passed.
    session: Option<Session>,
    /// Connection state.
    connection: ConnectionState,
    /// Rendering state.
    view: ViewModel,
    /// Chat input field.
    chat_input: TextInput,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
}

impl App {
    /// Create a new App with the given server address.
    pub fn new(server_addr: String) -> Self {
        Self {
            server_addr,
            gate: IdentityGate::new(),
            session: None,
            connection: ConnectionState::Disconnected,
            view: ViewModel::new(),
            chat_input: TextInput::new(),
            terminal_size: (80, 24),
            status_message: None,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick => vec![],
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::Connecting => {
                self.connection = ConnectionState::Connecting;
                vec![AppAction::Render]
            },
            AppEvent::Disconnected { reason } => {
                self.connection = ConnectionState::Disconnected;
                self.status_message = Some(format!("Disconnected: {reason}"));
                vec![AppAction::Render]
            },
            AppEvent::Inbound(event) => self.apply_inbound(event),
            AppEvent::DetectionToggled { enabled } => {
                self.view.set_detection(enabled);
                let notice =
                    if enabled { notices::DETECTION_ENABLED } else { notices::DETECTION_DISABLED };
                self.view.transcript_mut().append_system(notice);
                vec![AppAction::Render]
            },
        }
    }

    fn apply_inbound(&mut self, event: InboundEvent) -> Vec<AppAction> {
        match event {
            InboundEvent::Connect => {
                let Some(session) = &self.session else {
                    tracing::warn!("connect before the identity gate was passed; ignoring");
                    return vec![];
                };

                let announce =
                    OutboundEvent::UserJoined(UserJoined { username: session.username().into() });
                self.connection = ConnectionState::Connected;
                self.status_message = None;
                self.view.transcript_mut().append_system(notices::CONNECTED);
                vec![AppAction::Emit(announce), AppAction::Render]
            },
            InboundEvent::ProcessedFrame(ProcessedFrame { frame, num_faces, .. }) => {
                self.view.replace_frame(StreamFrame { image_data: frame, face_count: num_faces });
                vec![AppAction::Render]
            },
            InboundEvent::ClientUpdate(update) => {
                self.view.replace_roster(ViewerRoster::from(update));
                vec![AppAction::Render]
            },
            InboundEvent::ChatMessage(ChatMessage { username, message }) => {
                self.view.transcript_mut().append(username, message);
                vec![AppAction::Render]
            },
            InboundEvent::RecordingStatus(status) => {
                self.apply_recording_status(status);
                vec![AppAction::Render]
            },
        }
    }

    fn apply_recording_status(&mut self, status: RecordingStatus) {
        if status.is_started() {
            self.view.set_recording(RecordingState::Active, status.filename);
            self.view.transcript_mut().append_system(notices::RECORDING_STARTED);
        } else {
            self.view.set_recording(RecordingState::Idle, None);
            self.view.transcript_mut().append_system(notices::RECORDING_STOPPED);
        }
    }

    fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        if key == KeyInput::Esc {
            return self.quit();
        }

        if self.session.is_none() {
            return match key {
                KeyInput::Enter => self.submit_identity(),
                key => {
                    self.gate.edit(key);
                    vec![AppAction::Render]
                },
            };
        }

        match key {
            TOGGLE_DETECTION_KEY => self.toggle_detection(),
            START_RECORDING_KEY => {
                if self.view.recording_controls().start_enabled {
                    self.start_recording()
                } else {
                    vec![]
                }
            },
            STOP_RECORDING_KEY => {
                if self.view.recording_controls().stop_enabled {
                    self.stop_recording()
                } else {
                    vec![]
                }
            },
            KeyInput::Enter => self.send_chat(),
            KeyInput::Up => self.scroll(|t| t.scroll_up(1)),
            KeyInput::Down => self.scroll(|t| t.scroll_down(1)),
            KeyInput::PageUp => self.scroll(|t| t.scroll_up(PAGE_LINES)),
            KeyInput::PageDown => self.scroll(|t| t.scroll_down(PAGE_LINES)),
            key => {
                self.chat_input.apply(key);
                vec![AppAction::Render]
            },
        }
    }

    fn scroll(&mut self, f: impl FnOnce(&mut ChatTranscript)) -> Vec<AppAction> {
        f(self.view.transcript_mut());
        vec![AppAction::Render]
    }

    /// Pre-fill the username field of the identity gate.
    pub fn prefill_username(&mut self, username: impl Into<String>) {
        self.gate.prefill(username);
    }

    /// Confirm the identity gate.
    ///
    /// On the first valid submit the session is stored and the channel is
    /// requested. A rejected or repeated submit requests nothing.
    pub fn submit_identity(&mut self) -> Vec<AppAction> {
        match self.gate.submit() {
            Some(session) => {
                tracing::info!(username = session.username(), "identity accepted");
                self.session = Some(session);
                vec![AppAction::OpenChannel, AppAction::Render]
            },
            None => vec![AppAction::Render],
        }
    }

    /// Invert the detection toggle and ask the server to follow.
    ///
    /// The label and notice change immediately; the server never confirms.
    pub fn toggle_detection(&mut self) -> Vec<AppAction> {
        if self.session.is_none() {
            return vec![];
        }

        let enabled = !self.view.detection_enabled();
        let mut actions = vec![AppAction::Emit(OutboundEvent::ToggleProcessing(enabled))];
        actions.extend(self.handle(AppEvent::DetectionToggled { enabled }));
        actions
    }

    /// Ask the server to start recording. Nothing changes locally until the
    /// server reports `recording_status`.
    pub fn start_recording(&self) -> Vec<AppAction> {
        if self.session.is_none() {
            return vec![];
        }
        vec![AppAction::Emit(OutboundEvent::StartRecording)]
    }

    /// Ask the server to stop recording.
    pub fn stop_recording(&self) -> Vec<AppAction> {
        if self.session.is_none() {
            return vec![];
        }
        vec![AppAction::Emit(OutboundEvent::StopRecording)]
    }

    /// Send the chat field's trimmed text and clear the field.
    ///
    /// Blank input is dropped without feedback. The message is not appended
    /// locally; it shows up when the server echoes it.
    pub fn send_chat(&mut self) -> Vec<AppAction> {
        let Some(session) = &self.session else {
            return vec![];
        };

        let message = self.chat_input.text().trim();
        if message.is_empty() {
            return vec![];
        }

        let chat = ChatMessage { username: session.username().into(), message: message.into() };
        self.chat_input.clear();
        vec![AppAction::Emit(OutboundEvent::ChatMessage(chat)), AppAction::Render]
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    /// Server address (URL or `host:port`).
    pub fn server_addr(&self) -> &str {
        &self.server_addr
    }

    /// Identity gate.
    pub fn gate(&self) -> &IdentityGate {
        &self.gate
    }

    /// Participant session. `None` before the gate is passed.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Current connection state.
    pub fn connection_state(&self) -> &ConnectionState {
        &self.connection
    }

    /// Rendering state.
    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    /// Chat input field.
    pub fn chat_input(&self) -> &TextInput {
        &self.chat_input
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}
