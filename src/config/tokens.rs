use std::fmt;

use crate::position::Position;

/// Kinds of tokens produced by the config lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Section header, lexeme holds the text between the brackets
    ///
    /// # Examples
    /// ```text
    /// [database]
    /// [database.replica]
    /// ```
    BlockHeader,

    /// Property name
    Identifier,

    /// Assignment operator `=`
    Assign,

    /// Quoted string, lexeme holds the unescaped contents
    ///
    /// # Examples
    /// ```text
    /// "localhost"
    /// 'it\'s'
    /// ```
    String,

    /// Integer literal, optionally negative
    Integer,

    /// `true` or `false`
    Boolean,

    /// Opening bracket of an array value
    LBracket,

    /// Closing bracket of an array value
    RBracket,

    /// Array element separator
    Comma,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::BlockHeader => "block header",
            TokenKind::Identifier => "identifier",
            TokenKind::Assign => "'='",
            TokenKind::String => "string",
            TokenKind::Integer => "integer",
            TokenKind::Boolean => "boolean",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Comma => "','",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, position: Position) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            position,
        }
    }
}
