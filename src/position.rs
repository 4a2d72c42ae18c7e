use std::fmt;

/// Line/column location of a token or node in its source text.
///
/// Both counters are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Character cursor shared by both lexers.
///
/// Tracks the line/column of the current character so tokens and errors
/// carry accurate positions.
#[derive(Debug)]
pub(crate) struct Cursor {
    input: Vec<char>,
    offset: usize,
    line: usize,
    column: usize,
}

impl Cursor {
    pub(crate) fn new(input: &str) -> Self {
        Cursor {
            input: input.chars().collect(),
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    pub(crate) fn current(&self) -> Option<char> {
        self.input.get(self.offset).copied()
    }

    pub(crate) fn peek(&self, ahead: usize) -> Option<char> {
        self.input.get(self.offset + ahead).copied()
    }

    pub(crate) fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    pub(crate) fn advance(&mut self) {
        if let Some(ch) = self.current() {
            self.offset += 1;
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    /// Consumes characters while `pred` holds and returns them.
    pub(crate) fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current() {
            if !pred(ch) {
                break;
            }
            result.push(ch);
            self.advance();
        }
        result
    }
}

/// Error raised while reading a quoted string.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum QuoteError {
    InvalidEscape(char, Position),
    Unterminated(Position),
}

/// Reads a quoted string starting at the opening quote.
///
/// Supported escapes: `\\`, `\"`, `\'`, `\n`, `\t`, `\r`.
pub(crate) fn read_quoted(cursor: &mut Cursor) -> Result<String, QuoteError> {
    let start = cursor.position();
    let Some(quote) = cursor.current() else {
        return Err(QuoteError::Unterminated(start));
    };
    cursor.advance();

    let mut result = String::new();
    while let Some(ch) = cursor.current() {
        match ch {
            c if c == quote => {
                cursor.advance();
                return Ok(result);
            }
            '\\' => {
                let escape_at = cursor.position();
                cursor.advance();
                match cursor.current() {
                    Some('n') => result.push('\n'),
                    Some('t') => result.push('\t'),
                    Some('r') => result.push('\r'),
                    Some('"') => result.push('"'),
                    Some('\'') => result.push('\''),
                    Some('\\') => result.push('\\'),
                    Some(other) => return Err(QuoteError::InvalidEscape(other, escape_at)),
                    None => return Err(QuoteError::Unterminated(start)),
                }
                cursor.advance();
            }
            _ => {
                result.push(ch);
                cursor.advance();
            }
        }
    }

    Err(QuoteError::Unterminated(start))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_tracks_lines() {
        let mut cursor = Cursor::new("a\nbc");
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.position(), Position::new(2, 1));
        cursor.advance();
        assert_eq!(cursor.position(), Position::new(2, 2));
    }

    #[test]
    fn test_read_quoted_escapes() {
        let mut cursor = Cursor::new(r#""a\"b\n""#);
        assert_eq!(read_quoted(&mut cursor).unwrap(), "a\"b\n");
        assert_eq!(cursor.current(), None);
    }

    #[test]
    fn test_read_quoted_unterminated() {
        let mut cursor = Cursor::new("'abc");
        assert_eq!(
            read_quoted(&mut cursor),
            Err(QuoteError::Unterminated(Position::new(1, 1)))
        );
    }
}
