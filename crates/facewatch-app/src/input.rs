//! Terminal-agnostic keyboard input and editable text fields.

/// Keyboard input abstraction.
///
/// Decouples application logic from terminal libraries (crossterm, termion,
/// etc.) enabling deterministic simulation testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character.
    Char(char),
    /// Enter/Return key (confirm).
    Enter,
    /// Backspace key (delete character before cursor).
    Backspace,
    /// Delete key (delete character at cursor).
    Delete,
    /// Escape key (quit).
    Esc,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Up arrow key (scroll transcript back).
    Up,
    /// Down arrow key (scroll transcript forward).
    Down,
    /// Page Up key.
    PageUp,
    /// Page Down key.
    PageDown,
    /// Home key (cursor to start).
    Home,
    /// End key (cursor to end).
    End,
    /// Function key `F1`..`F12`.
    F(u8),
}

/// Single-line editable text with a cursor.
///
/// The cursor counts characters, not bytes, so editing is safe for any UTF-8
/// input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    buffer: String,
    cursor: usize,
}

impl TextInput {
    /// Create an empty field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the field holds no text.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Replace the text and put the cursor at the end.
    pub fn set(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.cursor = self.len();
    }

    /// Empty the field.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    /// Apply an editing key.
    ///
    /// Returns `true` if the text changed. Cursor movement alone returns
    /// `false`; keys that do not edit text are ignored.
    pub fn apply(&mut self, key: KeyInput) -> bool {
        match key {
            KeyInput::Char(c) => {
                let at = self.byte_offset(self.cursor);
                self.buffer.insert(at, c);
                self.cursor = self.cursor.saturating_add(1);
                true
            },
            KeyInput::Backspace => {
                if self.cursor == 0 {
                    return false;
                }
                self.cursor = self.cursor.saturating_sub(1);
                let at = self.byte_offset(self.cursor);
                self.buffer.remove(at);
                true
            },
            KeyInput::Delete => {
                if self.cursor >= self.len() {
                    return false;
                }
                let at = self.byte_offset(self.cursor);
                self.buffer.remove(at);
                true
            },
            KeyInput::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            },
            KeyInput::Right => {
                self.cursor = self.cursor.saturating_add(1).min(self.len());
                false
            },
            KeyInput::Home => {
                self.cursor = 0;
                false
            },
            KeyInput::End => {
                self.cursor = self.len();
                false
            },
            KeyInput::Enter
            | KeyInput::Esc
            | KeyInput::Up
            | KeyInput::Down
            | KeyInput::PageUp
            | KeyInput::PageDown
            | KeyInput::F(_) => false,
        }
    }

    fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.buffer.char_indices().nth(char_index).map_or(self.buffer.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> TextInput {
        let mut input = TextInput::new();
        for c in text.chars() {
            input.apply(KeyInput::Char(c));
        }
        input
    }

    #[test]
    fn char_input_adds_to_buffer() {
        let input = typed("hi");
        assert_eq!(input.text(), "hi");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn backspace_removes_char() {
        let mut input = typed("ab");
        assert!(input.apply(KeyInput::Backspace));
        assert_eq!(input.text(), "a");
        assert_eq!(input.cursor(), 1);
    }

    #[test]
    fn backspace_at_start_is_noop() {
        let mut input = typed("ab");
        input.apply(KeyInput::Home);
        assert!(!input.apply(KeyInput::Backspace));
        assert_eq!(input.text(), "ab");
    }

    #[test]
    fn cursor_movement() {
        let mut input = typed("abc");

        input.apply(KeyInput::Home);
        assert_eq!(input.cursor(), 0);

        input.apply(KeyInput::End);
        assert_eq!(input.cursor(), 3);

        input.apply(KeyInput::Left);
        assert_eq!(input.cursor(), 2);

        input.apply(KeyInput::Right);
        input.apply(KeyInput::Right);
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn multibyte_editing() {
        let mut input = typed("héllo");
        input.apply(KeyInput::Home);
        input.apply(KeyInput::Right);
        assert!(input.apply(KeyInput::Delete));
        assert_eq!(input.text(), "hllo");

        input.apply(KeyInput::Char('ë'));
        assert_eq!(input.text(), "hëllo");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn set_moves_cursor_to_end() {
        let mut input = TextInput::new();
        input.set("alice");
        assert_eq!(input.cursor(), 5);
        input.clear();
        assert!(input.is_empty());
        assert_eq!(input.cursor(), 0);
    }
}
