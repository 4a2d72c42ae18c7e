use rust_decimal::Decimal;
use thiserror::Error;

use crate::fql::tokens::{Token, TokenKind};
use crate::position::{Cursor, Position, QuoteError, read_quoted};

/// Longest filter expression accepted, in bytes.
pub const MAX_FILTER_LEN: usize = 2048;

/// Errors raised while tokenizing a filter expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("Unexpected character '{ch}' at column {column}")]
    UnexpectedChar {
        ch: char,
        line: usize,
        column: usize,
    },

    #[error("Unterminated string starting at column {column}")]
    UnterminatedString { line: usize, column: usize },

    #[error("Invalid escape sequence '\\{ch}' at column {column}")]
    InvalidEscape {
        ch: char,
        line: usize,
        column: usize,
    },

    #[error("Number '{lexeme}' out of range at column {column}")]
    NumberOutOfRange {
        lexeme: String,
        line: usize,
        column: usize,
    },

    #[error("Filter is {len} bytes long, the limit is {max}")]
    TooLong { len: usize, max: usize },
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

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '.' | '@' | '-' | '%')
}

/// Tokenizer for a single filter query-parameter value.
pub struct Lexer {
    cursor: Cursor,
    len: usize,
    tokens: Vec<Token>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            cursor: Cursor::new(input),
            len: input.len(),
            tokens: Vec::new(),
        }
    }

    pub fn lex(&mut self) -> Result<(), LexError> {
        if self.len > MAX_FILTER_LEN {
            return Err(LexError::TooLong {
                len: self.len,
                max: MAX_FILTER_LEN,
            });
        }

        while let Some(ch) = self.cursor.current() {
            let start = self.cursor.position();
            match ch {
                c if c.is_whitespace() => self.cursor.advance(),
                ':' => self.single(TokenKind::Colon, start),
                ',' => self.single(TokenKind::Comma, start),
                '[' => self.single(TokenKind::LBracket, start),
                ']' => self.single(TokenKind::RBracket, start),
                '"' | '\'' => {
                    let text = read_quoted(&mut self.cursor)?;
                    self.tokens.push(Token::new(TokenKind::Str, text, start));
                }
                c if is_word_char(c) => {
                    let word = self.cursor.take_while(is_word_char);
                    let kind = classify(&word, start)?;
                    self.tokens.push(Token::new(kind, word, start));
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

        log::debug!("fql lexer produced {} tokens", self.tokens.len());
        Ok(())
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    fn single(&mut self, kind: TokenKind, start: Position) {
        if let Some(ch) = self.cursor.current() {
            self.cursor.advance();
            self.tokens.push(Token::new(kind, ch.to_string(), start));
        }
    }
}

/// Decides whether a bare word is a keyword, a number or plain text.
///
/// A digit run with a leading zero (`01234`, `007.5`) stays a word so codes
/// such as postal or district numbers keep their exact digits.
fn classify(word: &str, start: Position) -> Result<TokenKind, LexError> {
    if let Some(kind) = TokenKind::keyword(word) {
        return Ok(kind);
    }

    let digits = word.strip_prefix('-').unwrap_or(word);
    let kind = match digits.split_once('.') {
        None if is_number(digits) => TokenKind::Integer,
        Some((whole, frac)) if is_number(whole) && is_digits(frac) => TokenKind::Decimal,
        _ => return Ok(TokenKind::Word),
    };

    // Decimals that would lose precision are rejected, never rounded
    let in_range = match kind {
        TokenKind::Integer => word.parse::<i64>().is_ok(),
        _ => Decimal::from_str_exact(word).is_ok(),
    };
    if !in_range {
        return Err(LexError::NumberOutOfRange {
            lexeme: word.to_string(),
            line: start.line,
            column: start.column,
        });
    }
    Ok(kind)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Digits without a redundant leading zero.
fn is_number(s: &str) -> bool {
    is_digits(s) && (s == "0" || !s.starts_with('0'))
}

/// Tokenizes `input` in one call.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(input);
    lexer.lex()?;
    Ok(lexer.into_tokens())
}

#[test]
fn test_classify_numbers() {
    let at = Position::new(1, 1);
    assert_eq!(classify("42", at), Ok(TokenKind::Integer));
    assert_eq!(classify("-3", at), Ok(TokenKind::Integer));
    assert_eq!(classify("12.50", at), Ok(TokenKind::Decimal));
    assert_eq!(classify("1.2.3", at), Ok(TokenKind::Word));
    assert_eq!(classify("v1", at), Ok(TokenKind::Word));
    assert_eq!(classify("GTE", at), Ok(TokenKind::Gte));
    assert_eq!(classify("0", at), Ok(TokenKind::Integer));
    assert_eq!(classify("0.25", at), Ok(TokenKind::Decimal));
    assert_eq!(classify("01234", at), Ok(TokenKind::Word));
    assert_eq!(classify("-007", at), Ok(TokenKind::Word));
    assert_eq!(classify("00.5", at), Ok(TokenKind::Word));
}
