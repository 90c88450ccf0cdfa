//! Identity gate.
//!
//! Blocks all session activity until the participant supplies a display name.
//! The gate is single-use: once passed it never reopens for the lifetime of
//! the process.

use crate::{KeyInput, TextInput};

/// The participant's session identity.
///
/// Created once by [`IdentityGate::submit`] and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    username: String,
    joined: bool,
}

impl Session {
    /// Display name, already trimmed and non-empty.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Always `true`; a session only exists after the gate was passed.
    pub fn is_joined(&self) -> bool {
        self.joined
    }
}

/// Username entry and validation.
#[derive(Debug, Clone, Default)]
pub struct IdentityGate {
    input: TextInput,
    error: bool,
    passed: bool,
}

impl IdentityGate {
    /// Create an open gate with an empty field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Username field.
    pub fn input(&self) -> &TextInput {
        &self.input
    }

    /// Whether the last submit was rejected and the field not edited since.
    pub fn has_error(&self) -> bool {
        self.error
    }

    /// Whether the gate has been passed.
    pub fn is_passed(&self) -> bool {
        self.passed
    }

    /// Pre-fill the username field.
    pub fn prefill(&mut self, text: impl Into<String>) {
        self.input.set(text);
        self.error = false;
    }

    /// Edit the username field. Any text change clears the error marker.
    pub fn edit(&mut self, key: KeyInput) {
        if self.passed {
            return;
        }
        if self.input.apply(key) {
            self.error = false;
        }
    }

    /// Validate the field.
    ///
    /// Returns the new [`Session`] on the first successful submit. An
    /// empty-after-trim name marks the field erroneous and returns `None`;
    /// every submit after the gate was passed returns `None`.
    pub fn submit(&mut self) -> Option<Session> {
        if self.passed {
            return None;
        }

        let username = self.input.text().trim();
        if username.is_empty() {
            self.error = true;
            return None;
        }

        let session = Session { username: username.to_string(), joined: true };
        self.passed = true;
        self.error = false;
        Some(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_username() {
        let mut gate = IdentityGate::new();
        gate.prefill("  alice \t");

        let session = gate.submit().expect("valid name");
        assert_eq!(session.username(), "alice");
        assert!(session.is_joined());
        assert!(gate.is_passed());
    }

    #[test]
    fn whitespace_only_is_rejected() {
        let mut gate = IdentityGate::new();
        gate.prefill("   ");

        assert!(gate.submit().is_none());
        assert!(gate.has_error());
        assert!(!gate.is_passed());
    }

    #[test]
    fn typing_clears_error() {
        let mut gate = IdentityGate::new();
        assert!(gate.submit().is_none());
        assert!(gate.has_error());

        gate.edit(KeyInput::Left);
        assert!(gate.has_error(), "cursor movement is not an edit");

        gate.edit(KeyInput::Char('b'));
        assert!(!gate.has_error());
    }

    #[test]
    fn gate_is_single_use() {
        let mut gate = IdentityGate::new();
        gate.prefill("alice");
        assert!(gate.submit().is_some());

        gate.edit(KeyInput::Char('x'));
        assert_eq!(gate.input().text(), "alice");
        assert!(gate.submit().is_none());
        assert!(!gate.has_error());
    }
}
