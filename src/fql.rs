//! # Filter Query Language (FQL)
//!
//! A filter mini-language carried in a single query-string parameter and
//! compiled to parameterized predicates.
//!
//! ## Quick Start
//!
//! ```text
//! ?filter=status:active,age:gte:18,role:[admin,editor]
//! ```
//!
//! compiles against an entity aliased `u` to
//!
//! ```text
//! (u.status = ?1 AND u.age >= ?2 AND u.role IN (?3, ?4))
//! ```
//!
//! with `?1 = "active"`, `?2 = 18`, `?3 = "admin"`, `?4 = "editor"`.
//!
//! ## Syntax
//!
//! - `key:value` - equality
//! - `key:op:value` - `op` is one of `eq`, `ne`, `gt`, `gte`, `lt`, `lte`, `like`
//! - `key:[a,b]` - IN; `key:ne:[a,b]` - NOT IN; `key:like:[a%,b%]` - any pattern
//! - `key:null` / `key:ne:null` - IS NULL / IS NOT NULL
//! - `or:[c1,c2]` / `and:[c1,c2]` - explicit groups, nestable
//! - Top-level conjuncts separated by `,` are AND-ed
//!
//! Values are bare words, quoted strings (`'a,b'`), integers, decimals,
//! `true`, `false` or `null`. Keywords are case-insensitive; quote a value
//! to use a keyword literally (`name:'like'`).
//!
//! ## Pipeline
//!
//! - **[lexer]** - parameter value to [`Token`]s
//! - **[parser]** - tokens to an [`Ast`] under an implicit `AndX` root
//! - **[interceptor]** - [`Interceptor`] walks the tree, binds values and
//!   appends the predicate to a [`crate::query::QueryBuilder`]
//! - **[factory]** - [`InterceptorFactory`] pulls the parameter from a
//!   [`Request`] and applies the [`FilterPolicy`]

pub mod ast;
pub mod factory;
pub mod interceptor;
pub mod lexer;
pub mod parser;
pub mod request;
pub mod tokens;

use thiserror::Error;

pub use ast::{Ast, ExprNode, Invokable, KeyValue, Literal, Node, Operator};
pub use factory::{
    DEFAULT_FILTER_PARAM, FilterError, FilterPolicy, InterceptorFactory, scope_by_route,
};
pub use interceptor::{Entity, InterceptError, Interceptor, Queryable};
pub use lexer::{LexError, Lexer, MAX_FILTER_LEN};
pub use parser::{MAX_DEPTH, ParseError, Parser};
pub use request::Request;
pub use tokens::{Token, TokenKind};

/// Errors from compiling a filter expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FqlError {
    #[error("Invalid filter: {0}")]
    Lex(#[from] LexError),

    #[error("Invalid filter: {0}")]
    Parse(#[from] ParseError),
}

/// Lexes and parses a filter expression.
///
/// # Examples
///
/// ```
/// use fql_lang::fql::compile;
///
/// let ast = compile("name:foo,age:gt:30").unwrap();
/// assert_eq!(ast.to_string(), r#"(AND (= name "foo") (> age 30))"#);
/// ```
pub fn compile(input: &str) -> Result<Ast, FqlError> {
    let mut lexer = Lexer::new(input);
    lexer.lex()?;
    Ok(Parser::new(lexer.into_tokens()).parse()?)
}
