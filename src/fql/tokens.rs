use std::fmt;

use crate::position::Position;

/// Kinds of tokens in a filter expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Bare word: a key, or an unquoted string value
    ///
    /// # Examples
    /// ```text
    /// name
    /// jane@example.com
    /// foo%
    /// ```
    Word,

    /// Integer literal
    Integer,

    /// Decimal literal
    ///
    /// # Examples
    /// ```text
    /// 12.50
    /// -0.5
    /// ```
    Decimal,

    /// Quoted string, lexeme holds the unescaped contents
    Str,

    Colon,
    Comma,
    LBracket,
    RBracket,

    // Operator keywords (case-insensitive)
    /// `eq`
    Eq,
    /// `ne`
    Ne,
    /// `gt`
    Gt,
    /// `gte`
    Gte,
    /// `lt`
    Lt,
    /// `lte`
    Lte,
    /// `like`
    Like,
    /// `and`
    And,
    /// `or`
    Or,

    // Literal keywords
    True,
    False,
    Null,
}

impl TokenKind {
    /// Maps a bare word to its keyword kind, if it is one.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word.to_ascii_lowercase().as_str() {
            "eq" => TokenKind::Eq,
            "ne" => TokenKind::Ne,
            "gt" => TokenKind::Gt,
            "gte" => TokenKind::Gte,
            "lt" => TokenKind::Lt,
            "lte" => TokenKind::Lte,
            "like" => TokenKind::Like,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            TokenKind::Eq
                | TokenKind::Ne
                | TokenKind::Gt
                | TokenKind::Gte
                | TokenKind::Lt
                | TokenKind::Lte
                | TokenKind::Like
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Word => "word",
            TokenKind::Integer => "integer",
            TokenKind::Decimal => "decimal",
            TokenKind::Str => "string",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Eq => "'eq'",
            TokenKind::Ne => "'ne'",
            TokenKind::Gt => "'gt'",
            TokenKind::Gte => "'gte'",
            TokenKind::Lt => "'lt'",
            TokenKind::Lte => "'lte'",
            TokenKind::Like => "'like'",
            TokenKind::And => "'and'",
            TokenKind::Or => "'or'",
            TokenKind::True => "'true'",
            TokenKind::False => "'false'",
            TokenKind::Null => "'null'",
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
