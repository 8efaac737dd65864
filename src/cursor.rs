use crate::error::SyntaxError;

/// Character-level reader over one document.
///
/// The parser only needs `current`; `previous` and `lookahead` round out the
/// view for callers scanning text of their own.
///
/// `current` is `None` once the input is exhausted; that end-of-text state is
/// sticky and `advance` does nothing from there on.
pub struct Cursor {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    capture: Option<String>,
}

fn is_line_break(left: char, next: Option<char>) -> bool {
    // "\r\n" breaks once, on the '\n'
    left == '\n' || (left == '\r' && next != Some('\n'))
}

impl Cursor {
    /// Trims `text` and positions the cursor on its first character.
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.trim_matches(is_whitespace).chars().collect();
        let column = if chars.is_empty() { 0 } else { 1 };
        Self {
            chars,
            pos: 0,
            line: 1,
            column,
            capture: None,
        }
    }

    /// Number of characters after trimming.
    pub fn source_len(&self) -> usize {
        self.chars.len()
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// The character before `current`; `None` at the start of the input.
    pub fn previous(&self) -> Option<char> {
        self.pos.checked_sub(1).and_then(|i| self.chars.get(i).copied())
    }

    /// The character after `current`, without advancing.
    pub fn lookahead(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    pub fn advance(&mut self) {
        let left = match self.current() {
            Some(ch) => ch,
            None => return,
        };
        if let Some(buf) = self.capture.as_mut() {
            buf.push(left);
        }
        self.pos += 1;
        if self.is_end_of_text() {
            return;
        }
        if is_line_break(left, self.current()) {
            self.line += 1;
            self.column = 0;
        }
        self.column += 1;
    }

    /// Starts collecting every character the cursor advances past.
    pub fn begin_capture(&mut self) {
        self.capture = Some(String::new());
    }

    /// Stops collecting and returns what was collected.
    pub fn end_capture(&mut self) -> String {
        self.capture.take().unwrap_or_default()
    }

    pub fn is_end_of_text(&self) -> bool {
        self.current().is_none()
    }

    pub fn is_alphanumeric(&self) -> bool {
        self.current().map_or(false, char::is_alphanumeric)
    }

    pub fn is_underscore(&self) -> bool {
        self.current() == Some('_')
    }

    pub fn is_whitespace(&self) -> bool {
        self.current().map_or(false, is_whitespace)
    }

    pub fn cur_char_is(&self, ch: char) -> bool {
        self.current() == Some(ch)
    }

    pub fn skip_whitespace(&mut self) {
        while self.is_whitespace() {
            self.advance();
        }
    }

    pub fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(message, self.line, self.column)
    }

    /// Describes the current character for error messages.
    pub fn describe_current(&self) -> String {
        match self.current() {
            Some(ch) => format!("'{}'", ch),
            None => String::from("end of text"),
        }
    }

    pub fn expect(&self, expected: char) -> Result<(), SyntaxError> {
        if self.cur_char_is(expected) {
            return Ok(());
        }
        Err(self.error(format!(
            "Expected '{}', got {}",
            expected,
            self.describe_current()
        )))
    }

    // check current char and skip it
    pub fn consume(&mut self, expected: char) -> Result<(), SyntaxError> {
        self.expect(expected)?;
        self.advance();
        Ok(())
    }
}

pub fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}
