//! CLI support for fql-lang
//!
//! Programmatic access to the `fql` commands, so other tools can embed
//! filter compilation and config dumping.

mod compile;
mod convert;
mod dump;

pub use compile::{CompileOptions, CompileResult, execute_compile};
pub use convert::{config_to_json, query_to_json};
pub use dump::{DumpOptions, DumpResult, execute_dump};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Filter(#[from] crate::fql::FilterError),

    #[error("Config error: {0}")]
    Config(#[from] crate::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No filter given. Pass a filter argument or --query.")]
    NoFilter,

    #[error("No config input. Pass files or pipe a config to stdin.")]
    NoInput,

    #[error("Key '{0}' not found")]
    MissingKey(String),
}

impl From<crate::FqlError> for CliError {
    fn from(e: crate::FqlError) -> Self {
        CliError::Filter(e.into())
    }
}
