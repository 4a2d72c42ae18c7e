use thiserror::Error;

use crate::config::tokens::{Token, TokenKind};
use crate::position::{Cursor, Position, QuoteError, read_quoted};

/// Errors raised while tokenizing a config file.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("Unexpected character '{ch}' at line {line}, column {column}")]
    UnexpectedChar {
        ch: char,
        line: usize,
        column: usize,
    },

    #[error("Unterminated string starting at line {line}, column {column}")]
    UnterminatedString { line: usize, column: usize },

    #[error("Invalid escape sequence '\\{ch}' at line {line}, column {column}")]
    InvalidEscape {
        ch: char,
        line: usize,
        column: usize,
    },

    #[error("Unterminated block header starting at line {line}, column {column}")]
    UnterminatedHeader { line: usize, column: usize },

    #[error("Empty block header at line {line}, column {column}")]
    EmptyHeader { line: usize, column: usize },

    #[error("Integer '{lexeme}' out of range at line {line}, column {column}")]
    IntegerOverflow {
        lexeme: String,
        line: usize,
        column: usize,
    },
}

impl From<QuoteError> for LexError {
    fn from(err: QuoteError) -> Self {
        match err {
            QuoteError::InvalidEscape(ch, at) => LexError::InvalidEscape {
                ch,
                line: at.line,
                column: at.column,
            },
            QuoteError::Unterminated(at) => LexError::UnterminatedString {
                line: at.line,
                column: at.column,
            },
        }
    }
}

/// Tokenizer for the block/property config format.
///
/// `[` means two things depending on where it appears: at the start of a
/// statement it opens a block header, after `=` it opens an array. The lexer
/// tracks which one applies.
pub struct Lexer {
    cursor: Cursor,
    tokens: Vec<Token>,
    expect_value: bool,
    array_depth: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            cursor: Cursor::new(input),
            tokens: Vec::new(),
            expect_value: false,
            array_depth: 0,
        }
    }

    /// Tokenizes the whole input into the internal buffer.
    pub fn lex(&mut self) -> Result<(), LexError> {
        while let Some(ch) = self.skip_trivia() {
            let start = self.cursor.position();
            match ch {
                '[' if self.in_value() => {
                    self.cursor.advance();
                    self.array_depth += 1;
                    self.expect_value = false;
                    self.push(TokenKind::LBracket, "[", start);
                }
                '[' => self.read_block_header(start)?,
                ']' if self.array_depth > 0 => {
                    self.cursor.advance();
                    self.array_depth -= 1;
                    self.push(TokenKind::RBracket, "]", start);
                }
                ',' if self.array_depth > 0 => {
                    self.cursor.advance();
                    self.push(TokenKind::Comma, ",", start);
                }
                '=' => {
                    self.cursor.advance();
                    self.push(TokenKind::Assign, "=", start);
                    self.expect_value = true;
                }
                '"' | '\'' => {
                    let text = read_quoted(&mut self.cursor)?;
                    self.push_literal(TokenKind::String, text, start);
                }
                c if c.is_ascii_digit()
                    || (c == '-' && self.cursor.peek(1).is_some_and(|d| d.is_ascii_digit())) =>
                {
                    self.read_integer(start)?;
                }
                c if c.is_ascii_alphabetic() || c == '_' => {
                    let word = self.cursor.take_while(is_identifier_char);
                    match word.as_str() {
                        "true" | "false" => self.push_literal(TokenKind::Boolean, word, start),
                        _ => self.push(TokenKind::Identifier, word, start),
                    }
                }
                ch => {
                    return Err(LexError::UnexpectedChar {
                        ch,
                        line: start.line,
                        column: start.column,
                    });
                }
            }
        }

        log::debug!("config lexer produced {} tokens", self.tokens.len());
        Ok(())
    }

    /// The tokens produced by [`Lexer::lex`], in source order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    fn in_value(&self) -> bool {
        self.expect_value || self.array_depth > 0
    }

    fn push(&mut self, kind: TokenKind, lexeme: impl Into<String>, position: Position) {
        self.tokens.push(Token::new(kind, lexeme, position));
    }

    /// Pushes a literal and leaves value position once a top-level value is complete.
    fn push_literal(&mut self, kind: TokenKind, lexeme: String, position: Position) {
        self.push(kind, lexeme, position);
        if self.array_depth == 0 {
            self.expect_value = false;
        }
    }

    /// Skips whitespace and comments, returning the next significant character.
    fn skip_trivia(&mut self) -> Option<char> {
        loop {
            match self.cursor.current()? {
                c if c.is_whitespace() => self.cursor.advance(),
                '#' | ';' => {
                    self.cursor.take_while(|c| c != '\n');
                }
                c => return Some(c),
            }
        }
    }

    fn read_block_header(&mut self, start: Position) -> Result<(), LexError> {
        self.cursor.advance(); // consume '['
        let header = self.cursor.take_while(|c| c != ']' && c != '\n');

        if self.cursor.current() != Some(']') {
            return Err(LexError::UnterminatedHeader {
                line: start.line,
                column: start.column,
            });
        }
        self.cursor.advance(); // consume ']'

        let header = header.trim();
        if header.is_empty() {
            return Err(LexError::EmptyHeader {
                line: start.line,
                column: start.column,
            });
        }

        self.push(TokenKind::BlockHeader, header, start);
        Ok(())
    }

    fn read_integer(&mut self, start: Position) -> Result<(), LexError> {
        let mut lexeme = String::new();
        if self.cursor.current() == Some('-') {
            lexeme.push('-');
            self.cursor.advance();
        }
        lexeme.push_str(&self.cursor.take_while(|c| c.is_ascii_digit()));

        if lexeme.parse::<i64>().is_err() {
            return Err(LexError::IntegerOverflow {
                lexeme,
                line: start.line,
                column: start.column,
            });
        }

        self.push_literal(TokenKind::Integer, lexeme, start);
        Ok(())
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Tokenizes `input` in one call.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(input);
    lexer.lex()?;
    Ok(lexer.into_tokens())
}

#[test]
fn test_header_then_assignment() {
    let tokens = tokenize("[db]\nport = 5432").unwrap();
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::BlockHeader,
            TokenKind::Identifier,
            TokenKind::Assign,
            TokenKind::Integer
        ]
    );
    assert_eq!(tokens[1].position, Position::new(2, 1));
}

#[test]
fn test_bracket_after_assign_is_array() {
    let tokens = tokenize("tags = ['a', 'b']").unwrap();
    assert_eq!(tokens[2].kind, TokenKind::LBracket);
    assert_eq!(tokens[4].kind, TokenKind::Comma);
    assert_eq!(tokens[6].kind, TokenKind::RBracket);
}
