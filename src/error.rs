use thiserror::Error;

/// The single failure a parse can end with.
///
/// `line` is 1-based; `column` counts the characters since the last line
/// terminator, so the first character of a line is column 1.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("error at line {line}, column {column}: {message}")]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

/// Errors from converting text into a [`Number`](crate::Number).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberError {
    #[error("empty number literal")]
    Empty,
    #[error("invalid number literal `{literal}`")]
    Invalid { literal: String },
    #[error("exponent out of range in `{literal}`")]
    ExponentOverflow { literal: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = SyntaxError::new("Expected `:`", 3, 7);
        assert_eq!(e.to_string(), "error at line 3, column 7: Expected `:`");

        let e = NumberError::Invalid {
            literal: String::from("1.2.3"),
        };
        assert_eq!(e.to_string(), "invalid number literal `1.2.3`");
    }
}
