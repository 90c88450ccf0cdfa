//! Observable application state types.
//!
//! This module defines the [`ViewModel`], the single source of truth for
//! rendering: stream frame, detection count, viewer roster, recording status,
//! detection toggle and chat transcript.
//!
//! Mutators are crate-private and only called from [`crate::App::handle`], so
//! the view model has exactly one writer. Renderers read it through the public
//! accessors and derived labels; they never feed state back.

use facewatch_proto::payloads::{ClientInfo, ClientUpdate};

use crate::ChatTranscript;

/// Label used for viewers without a display name.
pub const ANONYMOUS: &str = "Anonymous";

/// Avatar glyph for viewers without a display name.
pub const UNKNOWN_AVATAR: &str = "?";

/// Connection state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected to server.
    Disconnected,
    /// Connection in progress.
    Connecting,
    /// Channel is up and presence was announced.
    Connected,
}

/// Latest processed frame. No history is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamFrame {
    /// Encoded image as delivered by the server. Opaque.
    pub image_data: String,
    /// Faces detected in this frame.
    pub face_count: u32,
}

/// One roster entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerEntry {
    /// Display name. `None` when the server sent none or an empty one.
    pub username: Option<String>,
    /// Connection time as presented by the server.
    pub connected_at: String,
}

impl ViewerEntry {
    /// Name to show, falling back to [`ANONYMOUS`].
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(ANONYMOUS)
    }

    /// Uppercased first character of the name, or [`UNKNOWN_AVATAR`].
    pub fn avatar(&self) -> String {
        self.username
            .as_deref()
            .and_then(|name| name.chars().next())
            .map_or_else(|| UNKNOWN_AVATAR.to_string(), |c| c.to_uppercase().collect())
    }
}

impl From<ClientInfo> for ViewerEntry {
    fn from(info: ClientInfo) -> Self {
        Self {
            username: info.username.filter(|name| !name.is_empty()),
            connected_at: info.connected_at.unwrap_or_default(),
        }
    }
}

/// Viewer roster, replaced wholesale on every update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewerRoster {
    /// Viewer count as reported by the server.
    pub total_count: u32,
    /// Entries in server order.
    pub entries: Vec<ViewerEntry>,
}

impl From<ClientUpdate> for ViewerRoster {
    fn from(update: ClientUpdate) -> Self {
        Self {
            total_count: update.count,
            entries: update.clients.into_iter().map(ViewerEntry::from).collect(),
        }
    }
}

/// Server-confirmed recording state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    /// Not recording.
    Idle,
    /// Recording in progress.
    Active,
}

/// Enabled/active flags for the recording controls, derived from
/// [`RecordingState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordingControls {
    /// Start control accepts input.
    pub start_enabled: bool,
    /// Stop control accepts input.
    pub stop_enabled: bool,
    /// Recording indicator is lit.
    pub indicator_active: bool,
}

/// Rendering state for the whole session surface.
#[derive(Debug, Clone)]
pub struct ViewModel {
    frame: Option<StreamFrame>,
    frames_received: u64,
    roster: ViewerRoster,
    recording: RecordingState,
    recording_file: Option<String>,
    detection_enabled: bool,
    transcript: ChatTranscript,
}

impl Default for ViewModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewModel {
    /// Empty view model: no frame, empty roster, idle recording, detection
    /// off.
    pub fn new() -> Self {
        Self {
            frame: None,
            frames_received: 0,
            roster: ViewerRoster::default(),
            recording: RecordingState::Idle,
            recording_file: None,
            detection_enabled: false,
            transcript: ChatTranscript::new(),
        }
    }

    /// Latest frame. `None` before the first one arrives.
    pub fn frame(&self) -> Option<&StreamFrame> {
        self.frame.as_ref()
    }

    /// Frames received since the session started.
    pub fn frames_received(&self) -> u64 {
        self.frames_received
    }

    /// Current roster.
    pub fn roster(&self) -> &ViewerRoster {
        &self.roster
    }

    /// Server-confirmed recording state.
    pub fn recording(&self) -> RecordingState {
        self.recording
    }

    /// Output file of the active recording, when the server named one.
    pub fn recording_file(&self) -> Option<&str> {
        self.recording_file.as_deref()
    }

    /// Local detection toggle.
    pub fn detection_enabled(&self) -> bool {
        self.detection_enabled
    }

    /// Chat transcript.
    pub fn transcript(&self) -> &ChatTranscript {
        &self.transcript
    }

    /// `Faces Detected: {n}`, counting zero before the first frame.
    pub fn face_count_label(&self) -> String {
        let count = self.frame.as_ref().map_or(0, |f| f.face_count);
        format!("Faces Detected: {count}")
    }

    /// `Total Viewers: {n}`.
    pub fn viewer_count_label(&self) -> String {
        format!("Total Viewers: {}", self.roster.total_count)
    }

    /// `Detection: ON` or `Detection: OFF`.
    pub fn detection_label(&self) -> &'static str {
        if self.detection_enabled { "Detection: ON" } else { "Detection: OFF" }
    }

    /// Control flags for the current recording state.
    pub fn recording_controls(&self) -> RecordingControls {
        let active = self.recording == RecordingState::Active;
        RecordingControls { start_enabled: !active, stop_enabled: active, indicator_active: active }
    }

    pub(crate) fn replace_frame(&mut self, frame: StreamFrame) {
        self.frame = Some(frame);
        self.frames_received = self.frames_received.saturating_add(1);
    }

    pub(crate) fn replace_roster(&mut self, roster: ViewerRoster) {
        self.roster = roster;
    }

    pub(crate) fn set_recording(&mut self, state: RecordingState, file: Option<String>) {
        self.recording = state;
        self.recording_file = file;
    }

    pub(crate) fn set_detection(&mut self, enabled: bool) {
        self.detection_enabled = enabled;
    }

    pub(crate) fn transcript_mut(&mut self) -> &mut ChatTranscript {
        &mut self.transcript
    }
}
