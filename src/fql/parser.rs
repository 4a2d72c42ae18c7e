use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::fql::ast::{Ast, Literal, Operator};
use crate::fql::tokens::{Token, TokenKind};
use crate::position::Position;

/// Deepest allowed nesting of `and:[...]` / `or:[...]` groups.
pub const MAX_DEPTH: usize = 8;

/// Keys end up in generated SQL as column names, so they are restricted to
/// plain identifiers.
static KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("key pattern is valid"));

/// Errors raised while parsing a filter token stream.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Expected {expected}, found {found} at column {column}")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
        column: usize,
    },

    #[error("Expected {expected}, found end of filter")]
    UnexpectedEof { expected: String },

    #[error("Filter is empty")]
    EmptyFilter,

    #[error("Invalid field name '{key}' at column {column}")]
    InvalidKey {
        key: String,
        line: usize,
        column: usize,
    },

    #[error("Operator {operator} does not accept a list at column {column}")]
    ListNotAllowed {
        operator: String,
        line: usize,
        column: usize,
    },

    #[error("Operator {operator} does not accept null at column {column}")]
    NullNotAllowed {
        operator: String,
        line: usize,
        column: usize,
    },

    #[error("'like' needs a string pattern at column {column}")]
    LikeNeedsString { line: usize, column: usize },

    #[error("Filter groups nested deeper than {max} at column {column}")]
    TooDeep {
        max: usize,
        line: usize,
        column: usize,
    },
}

/// Whether `key` may be used as a column name in generated SQL.
pub fn is_valid_key(key: &str) -> bool {
    KEY_PATTERN.is_match(key)
}

/// Recursive-descent parser for filter expressions.
///
/// ```text
/// filter     := conjunct (',' conjunct)*
/// conjunct   := junction | comparison
/// junction   := ('and' | 'or') ':' '[' conjunct (',' conjunct)* ']'
/// comparison := KEY ':' (op ':')? operand
/// operand    := literal | '[' literal (',' literal)* ']'
/// ```
///
/// Top-level conjuncts become children of an implicit `AndX` root.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            position: 0,
        }
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn current_kind(&self) -> Option<TokenKind> {
        self.current().map(|t| t.kind)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == Some(kind)
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.current() {
            Some(token) => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: format!("{} '{}'", token.kind, token.lexeme),
                line: token.position.line,
                column: token.position.column,
            },
            None => ParseError::UnexpectedEof {
                expected: expected.to_string(),
            },
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        match self.current() {
            Some(token) if token.kind == kind => {
                let token = token.clone();
                self.advance();
                Ok(token)
            }
            _ => Err(self.unexpected(&kind.to_string())),
        }
    }

    /// Parses the whole filter.
    pub fn parse(mut self) -> Result<Ast, ParseError> {
        if self.tokens.is_empty() {
            return Err(ParseError::EmptyFilter);
        }

        let mut root = Ast::root();
        loop {
            root.push(self.parse_conjunct(0)?);
            if !self.check(TokenKind::Comma) {
                break;
            }
            self.advance();
        }

        if self.current().is_some() {
            return Err(self.unexpected("',' or end of filter"));
        }

        log::debug!("fql parser built {} top-level conjuncts", root.children.len());
        Ok(root)
    }

    fn parse_conjunct(&mut self, depth: usize) -> Result<Ast, ParseError> {
        match self.current_kind() {
            Some(TokenKind::And) | Some(TokenKind::Or) => self.parse_junction(depth),
            _ => self.parse_comparison(),
        }
    }

    fn parse_junction(&mut self, depth: usize) -> Result<Ast, ParseError> {
        let Some(token) = self.current().cloned() else {
            return Err(self.unexpected("'and' or 'or'"));
        };

        if depth + 1 > MAX_DEPTH {
            return Err(ParseError::TooDeep {
                max: MAX_DEPTH,
                line: token.position.line,
                column: token.position.column,
            });
        }

        let operator = match token.kind {
            TokenKind::And => Operator::AndX,
            TokenKind::Or => Operator::OrX,
            _ => return Err(self.unexpected("'and' or 'or'")),
        };
        self.advance();
        self.expect(TokenKind::Colon)?;
        self.expect(TokenKind::LBracket)?;

        let mut children = vec![self.parse_conjunct(depth + 1)?];
        while self.check(TokenKind::Comma) {
            self.advance();
            children.push(self.parse_conjunct(depth + 1)?);
        }
        self.expect(TokenKind::RBracket)?;

        Ok(Ast::operator(operator, token.position, children))
    }

    fn parse_comparison(&mut self) -> Result<Ast, ParseError> {
        let key = self.parse_key()?;
        self.expect(TokenKind::Colon)?;

        let op = match self.current_kind() {
            Some(kind) if kind.is_comparison() => {
                self.advance();
                self.expect(TokenKind::Colon)?;
                Some(kind)
            }
            _ => None,
        };

        let operand = if self.check(TokenKind::LBracket) {
            self.parse_list()?
        } else {
            self.parse_literal()?
        };

        build_comparison(op, key.lexeme, operand, key.position)
    }

    fn parse_key(&mut self) -> Result<Token, ParseError> {
        let token = match self.current() {
            Some(token) if token.kind == TokenKind::Word => token.clone(),
            _ => return Err(self.unexpected("field name")),
        };

        if !is_valid_key(&token.lexeme) {
            return Err(ParseError::InvalidKey {
                key: token.lexeme,
                line: token.position.line,
                column: token.position.column,
            });
        }

        self.advance();
        Ok(token)
    }

    fn parse_list(&mut self) -> Result<Literal, ParseError> {
        self.expect(TokenKind::LBracket)?;

        let mut items = vec![self.parse_literal()?];
        while self.check(TokenKind::Comma) {
            self.advance();
            items.push(self.parse_literal()?);
        }
        self.expect(TokenKind::RBracket)?;

        Ok(Literal::List(items))
    }

    fn parse_literal(&mut self) -> Result<Literal, ParseError> {
        let Some(token) = self.current() else {
            return Err(self.unexpected("value"));
        };

        let literal = match token.kind {
            TokenKind::Word | TokenKind::Str => Literal::String(token.lexeme.clone()),
            TokenKind::Integer => match token.lexeme.parse::<i64>() {
                Ok(n) => Literal::Integer(n),
                Err(_) => return Err(self.unexpected("integer")),
            },
            TokenKind::Decimal => match Decimal::from_str_exact(&token.lexeme) {
                Ok(d) => Literal::Decimal(d),
                Err(_) => return Err(self.unexpected("decimal")),
            },
            TokenKind::True => Literal::Boolean(true),
            TokenKind::False => Literal::Boolean(false),
            TokenKind::Null => Literal::Null,
            _ => return Err(self.unexpected("value")),
        };

        self.advance();
        Ok(literal)
    }
}

/// Picks the operator node for `key:op:operand`.
fn build_comparison(
    op: Option<TokenKind>,
    key: String,
    operand: Literal,
    at: Position,
) -> Result<Ast, ParseError> {
    let op_name = op.map_or_else(|| "eq".to_string(), |kind| kind.to_string());

    let operator = match (op, &operand) {
        (None | Some(TokenKind::Eq), Literal::Null) => Operator::IsNull,
        (Some(TokenKind::Ne), Literal::Null) => Operator::IsNotNull,
        (_, Literal::Null) => {
            return Err(ParseError::NullNotAllowed {
                operator: op_name,
                line: at.line,
                column: at.column,
            });
        }
        (_, Literal::List(items)) if items.contains(&Literal::Null) => {
            return Err(ParseError::NullNotAllowed {
                operator: op_name,
                line: at.line,
                column: at.column,
            });
        }
        (None | Some(TokenKind::Eq), Literal::List(_)) => Operator::In,
        (Some(TokenKind::Ne), Literal::List(_)) => Operator::NotIn,
        (Some(TokenKind::Like), Literal::List(patterns)) => {
            return like_any(key, patterns, at);
        }
        (_, Literal::List(_)) => {
            return Err(ParseError::ListNotAllowed {
                operator: op_name,
                line: at.line,
                column: at.column,
            });
        }
        (Some(TokenKind::Like), Literal::String(_)) => Operator::Like,
        (Some(TokenKind::Like), _) => {
            return Err(ParseError::LikeNeedsString {
                line: at.line,
                column: at.column,
            });
        }
        (Some(TokenKind::Ne), _) => Operator::Neq,
        (Some(TokenKind::Gt), _) => Operator::Gt,
        (Some(TokenKind::Gte), _) => Operator::Gte,
        (Some(TokenKind::Lt), _) => Operator::Lt,
        (Some(TokenKind::Lte), _) => Operator::Lte,
        _ => Operator::Eq,
    };

    let value = match operator {
        Operator::IsNull | Operator::IsNotNull => Literal::Null,
        _ => operand,
    };
    Ok(Ast::comparison(operator, at, key, value))
}

/// `key:like:[a,b]` becomes `(OR (LIKE key a) (LIKE key b))`.
fn like_any(key: String, patterns: &[Literal], at: Position) -> Result<Ast, ParseError> {
    let children = patterns
        .iter()
        .map(|pattern| match pattern {
            Literal::String(_) => Ok(Ast::comparison(
                Operator::Like,
                at,
                key.clone(),
                pattern.clone(),
            )),
            _ => Err(ParseError::LikeNeedsString {
                line: at.line,
                column: at.column,
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Ast::operator(Operator::OrX, at, children))
}

/// Parses a token stream in one call.
pub fn parse(tokens: Vec<Token>) -> Result<Ast, ParseError> {
    Parser::new(tokens).parse()
}
