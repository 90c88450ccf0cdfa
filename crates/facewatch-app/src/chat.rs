//! Chat relay.
//!
//! Append-only transcript shared by participant messages and system notices.
//! Both go through [`ChatTranscript::append`]; a system notice is simply a
//! message authored by [`SYSTEM_AUTHOR`].

use std::fmt;

/// Author label for controller-generated notices.
pub const SYSTEM_AUTHOR: &str = "System";

/// Notice texts appended by the controller.
pub mod notices {
    /// Channel (re)connected.
    pub const CONNECTED: &str = "Connected to stream";
    /// Server confirmed a recording start.
    pub const RECORDING_STARTED: &str = "Recording started";
    /// Server reported a recording stop.
    pub const RECORDING_STOPPED: &str = "Recording stopped";
    /// Detection toggled on locally.
    pub const DETECTION_ENABLED: &str = "Detection enabled";
    /// Detection toggled off locally.
    pub const DETECTION_DISABLED: &str = "Detection disabled";
}

/// One transcript line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Author label.
    pub author: String,
    /// Message body.
    pub body: String,
}

impl ChatMessage {
    /// Whether the controller authored this line.
    pub fn is_system(&self) -> bool {
        self.author == SYSTEM_AUTHOR
    }
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.author, self.body)
    }
}

/// Append-only transcript with a bottom-anchored view.
///
/// `scroll_back` counts lines between the newest message and the bottom of the
/// view. Every append resets it to zero so the latest message is visible.
#[derive(Debug, Clone, Default)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
    scroll_back: usize,
}

impl ChatTranscript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages, oldest first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the transcript is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Lines scrolled back from the bottom. Zero means pinned to the latest
    /// message.
    pub fn scroll_back(&self) -> usize {
        self.scroll_back
    }

    pub(crate) fn append(&mut self, author: impl Into<String>, body: impl Into<String>) {
        self.messages.push(ChatMessage { author: author.into(), body: body.into() });
        self.scroll_back = 0;
    }

    pub(crate) fn append_system(&mut self, body: impl Into<String>) {
        self.append(SYSTEM_AUTHOR, body);
    }

    pub(crate) fn scroll_up(&mut self, lines: usize) {
        let max = self.messages.len().saturating_sub(1);
        self.scroll_back = self.scroll_back.saturating_add(lines).min(max);
    }

    pub(crate) fn scroll_down(&mut self, lines: usize) {
        self.scroll_back = self.scroll_back.saturating_sub(lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_notices_share_the_path() {
        let mut transcript = ChatTranscript::new();
        transcript.append("alice", "hello");
        transcript.append_system(notices::CONNECTED);

        let lines: Vec<String> = transcript.messages().iter().map(ToString::to_string).collect();
        assert_eq!(lines, ["alice: hello", "System: Connected to stream"]);
        assert!(!transcript.messages()[0].is_system());
        assert!(transcript.messages()[1].is_system());
    }

    #[test]
    fn append_snaps_to_bottom() {
        let mut transcript = ChatTranscript::new();
        for i in 0..10 {
            transcript.append("bob", format!("{i}"));
        }

        transcript.scroll_up(4);
        assert_eq!(transcript.scroll_back(), 4);

        transcript.append("bob", "new");
        assert_eq!(transcript.scroll_back(), 0);
    }

    #[test]
    fn scroll_is_clamped() {
        let mut transcript = ChatTranscript::new();
        transcript.scroll_up(3);
        assert_eq!(transcript.scroll_back(), 0);

        transcript.append("a", "1");
        transcript.append("a", "2");
        transcript.scroll_up(100);
        assert_eq!(transcript.scroll_back(), 1);

        transcript.scroll_down(100);
        assert_eq!(transcript.scroll_back(), 0);
    }
}
