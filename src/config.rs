//! # Block/Property Configuration Compiler
//!
//! Loads application settings from a small section-based file format:
//!
//! ```text
//! # comment
//! [database]
//! host = "localhost"
//! port = 5432
//!
//! [database.replica]
//! hosts = ['10.0.0.2', '10.0.0.3']
//! enabled = true
//! ```
//!
//! ## Pipeline
//!
//! - **[lexer]** - source text to [`Token`]s
//! - **[parser]** - tokens to an [`Ast`] rooted at a `Root` node
//! - **[visitor]** - [`Resolver`] turns blocks into key paths and
//!   assignments into entries
//! - **[evaluator]** - [`Config`] walks the tree and builds the nested mapping
//!
//! ## Merge Semantics
//!
//! A block declared twice, or the same file loaded twice, is merged:
//! tables merge recursively, arrays concatenate, and the last scalar wins.
//! A block opened over a key that already holds a scalar is an error,
//! whether both come from one file or from two merged ones.
//!
//! ## Lookup
//!
//! [`Config::get`] takes a dotted path and returns `None` for anything
//! missing, so optional sections can simply be left out.

pub mod ast;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod tokens;
pub mod value;
pub mod visitor;

use std::{io, path::PathBuf};

use thiserror::Error;

pub use ast::{Ast, Node, NodeKind, Visitor};
pub use evaluator::Config;
pub use lexer::{LexError, Lexer};
pub use parser::{ParseError, Parser};
pub use tokens::{Token, TokenKind};
pub use value::{Table, Value};
pub use visitor::{Resolved, Resolver};

/// Errors that can occur while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Lex error: {0}")]
    Lex(#[from] LexError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A block needs a table where a scalar or array is already stored
    #[error("Cannot open '{path}' as a block, it already holds a {found}")]
    PathConflict { path: String, found: &'static str },

    #[error("Malformed config tree at line {line}, column {column}: {reason}")]
    MalformedTree {
        reason: String,
        line: usize,
        column: usize,
    },
}
