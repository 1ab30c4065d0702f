//! Input field handling for the terminal user interface.

/// A single-line text input with a cursor.
///
/// `cursor` counts characters, not bytes, so multi-byte input edits cleanly.
#[derive(Clone, Debug, Default)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
    pub active: bool,
}

impl InputField {
    /// Create a new empty input field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an input field with initial text value, cursor at the end.
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
            active: false,
        }
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    /// Insert a character at the current cursor position.
    pub fn handle_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            let at = self.byte_index(self.cursor - 1);
            self.value.remove(at);
            self.cursor -= 1;
        }
    }

    /// Delete the character at the cursor position.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    /// Value with the cursor drawn in, for rendering the active field.
    pub fn display_with_cursor(&self) -> String {
        let at = self.byte_index(self.cursor);
        format!("{}│{}", &self.value[..at], &self.value[at..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_and_editing() {
        let mut field = InputField::new();
        for c in "Bob".chars() {
            field.handle_char(c);
        }
        field.move_cursor_left();
        field.handle_backspace();
        assert_eq!(field.value, "Bb");
        field.handle_delete();
        assert_eq!(field.value, "B");
        assert_eq!(field.cursor, 1);
    }

    #[test]
    fn test_multibyte_input() {
        let mut field = InputField::with_value("Zoë");
        assert_eq!(field.cursor, 3);
        field.handle_backspace();
        assert_eq!(field.value, "Zo");
        field.handle_char('é');
        field.move_cursor_left();
        field.move_cursor_left();
        field.handle_char('-');
        assert_eq!(field.value, "Z-oé");
        assert_eq!(field.display_with_cursor(), "Z-│oé");
    }

    #[test]
    fn test_cursor_bounds() {
        let mut field = InputField::with_value("a");
        field.move_cursor_right();
        assert_eq!(field.cursor, 1);
        field.handle_delete();
        assert_eq!(field.value, "a");
        field.handle_backspace();
        field.move_cursor_left();
        field.handle_backspace();
        assert_eq!(field.cursor, 0);
        assert!(field.value.is_empty());
    }
}
