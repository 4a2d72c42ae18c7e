use thiserror::Error;

use crate::config::ast::{Ast, Node, NodeKind};
use crate::config::tokens::{Token, TokenKind};
use crate::config::value::Value;

/// Errors raised while parsing a config token stream.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Expected {expected}, found {found} at line {line}, column {column}")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
        column: usize,
    },

    #[error("Expected {expected}, found end of input")]
    UnexpectedEof { expected: String },

    #[error("Property '{key}' at line {line}, column {column} appears before any block header")]
    PropertyOutsideBlock {
        key: String,
        line: usize,
        column: usize,
    },

    #[error("Invalid block header '[{header}]' at line {line}, column {column}")]
    InvalidHeader {
        header: String,
        line: usize,
        column: usize,
    },
}

/// Recursive-descent parser for the config format.
///
/// ```text
/// file       := block*
/// block      := HEADER assignment*
/// assignment := IDENTIFIER '=' value
/// value      := STRING | INTEGER | BOOLEAN | array
/// array      := '[' (value (',' value)* ','?)? ']'
/// ```
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

    fn check(&self, kind: TokenKind) -> bool {
        self.current().is_some_and(|t| t.kind == kind)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
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
        if self.check(kind) {
            // check() guarantees a token is present
            self.advance().ok_or_else(|| self.unexpected(&kind.to_string()))
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    /// Parses the whole token stream into a tree rooted at a `Root` node.
    pub fn parse(mut self) -> Result<Ast, ParseError> {
        let mut root = Ast::root();

        while let Some(token) = self.current() {
            if token.kind == TokenKind::Identifier {
                return Err(ParseError::PropertyOutsideBlock {
                    key: token.lexeme.clone(),
                    line: token.position.line,
                    column: token.position.column,
                });
            }
            if token.kind != TokenKind::BlockHeader {
                return Err(self.unexpected("block header"));
            }
            let block = self.parse_block()?;
            root.push(block);
        }

        log::debug!("config parser built {} blocks", root.children.len());
        Ok(root)
    }

    fn parse_block(&mut self) -> Result<Ast, ParseError> {
        let header = self.expect(TokenKind::BlockHeader)?;
        validate_header(&header)?;

        let mut block = Ast::new(Node::new(
            NodeKind::Block,
            Value::String(header.lexeme),
            header.position,
        ));

        while let Some(kind) = self.current().map(|t| t.kind) {
            match kind {
                TokenKind::BlockHeader => break,
                TokenKind::Identifier => block.push(self.parse_assignment()?),
                _ => return Err(self.unexpected("property name or block header")),
            }
        }

        Ok(block)
    }

    fn parse_assignment(&mut self) -> Result<Ast, ParseError> {
        let key = self.expect(TokenKind::Identifier)?;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_value()?;

        let key_node = Ast::new(Node::new(
            NodeKind::Identifier,
            Value::String(key.lexeme),
            key.position,
        ));

        Ok(Ast::with_children(
            Node::structural(NodeKind::Assignment, key.position),
            vec![key_node, value],
        ))
    }

    fn parse_value(&mut self) -> Result<Ast, ParseError> {
        let Some(token) = self.current().cloned() else {
            return Err(self.unexpected("value"));
        };

        let (kind, value) = match token.kind {
            TokenKind::LBracket => return self.parse_array(),
            TokenKind::String => (NodeKind::String, Value::String(token.lexeme)),
            TokenKind::Boolean => (NodeKind::Boolean, Value::Boolean(token.lexeme == "true")),
            TokenKind::Integer => match token.lexeme.parse::<i64>() {
                Ok(n) => (NodeKind::Integer, Value::Integer(n)),
                Err(_) => return Err(self.unexpected("integer within range")),
            },
            _ => return Err(self.unexpected("value")),
        };

        let position = token.position;
        self.advance();
        Ok(Ast::new(Node::new(kind, value, position)))
    }

    fn parse_array(&mut self) -> Result<Ast, ParseError> {
        let open = self.expect(TokenKind::LBracket)?;
        let mut elements = vec![];

        while !self.check(TokenKind::RBracket) {
            elements.push(self.parse_value()?);

            if !self.check(TokenKind::RBracket) {
                self.expect(TokenKind::Comma)?;
            }
        }

        self.expect(TokenKind::RBracket)?;
        Ok(Ast::with_children(
            Node::structural(NodeKind::Array, open.position),
            elements,
        ))
    }
}

/// Each dotted segment of a header must be a non-empty identifier.
fn validate_header(token: &Token) -> Result<(), ParseError> {
    let valid = token.lexeme.split('.').all(|segment| {
        let mut chars = segment.chars();
        chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    });

    if valid {
        Ok(())
    } else {
        Err(ParseError::InvalidHeader {
            header: token.lexeme.clone(),
            line: token.position.line,
            column: token.position.column,
        })
    }
}

/// Parses a token stream in one call.
pub fn parse(tokens: Vec<Token>) -> Result<Ast, ParseError> {
    Parser::new(tokens).parse()
}
