//! Load config files and print the merged mapping

use super::{CliError, config_to_json};
use crate::Config;

/// Options for the config command
#[derive(Debug, Clone, Default)]
pub struct DumpOptions {
    /// Files to load, merged in order
    pub files: Vec<String>,
    /// Config source read from stdin, used when no files are given
    pub input: Option<String>,
    /// Dotted key to print instead of the whole mapping
    pub get: Option<String>,
    /// Only validate syntax, don't print
    pub syntax_only: bool,
}

/// Result of a config dump
#[derive(Debug)]
pub enum DumpResult {
    SyntaxValid,
    Success(serde_json::Value),
}

/// Execute a config dump
pub fn execute_dump(options: &DumpOptions) -> Result<DumpResult, CliError> {
    let config = if !options.files.is_empty() {
        Config::load_all(&options.files)?
    } else {
        let input = options.input.as_deref().ok_or(CliError::NoInput)?;
        Config::from_source(input)?
    };

    if options.syntax_only {
        return Ok(DumpResult::SyntaxValid);
    }

    match &options.get {
        Some(path) => config
            .get(path)
            .map(|value| DumpResult::Success(value.to_json()))
            .ok_or_else(|| CliError::MissingKey(path.clone())),
        None => Ok(DumpResult::Success(config_to_json(&config))),
    }
}
