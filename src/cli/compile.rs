//! Compile a filter against a table and show the resulting query

use super::{CliError, query_to_json};
use crate::fql::{self, Entity, FilterPolicy, InterceptorFactory, Request};

/// Options for the compile command
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// The filter expression, as it would appear decoded in the parameter
    pub filter: Option<String>,
    /// Raw query string to read the filter parameter from instead
    pub query_string: Option<String>,
    /// Table to select from
    pub table: String,
    /// Alias used for column references
    pub alias: String,
    /// Allowed fields, any field when empty
    pub fields: Vec<String>,
    /// Fail instead of falling back to an unfiltered query
    pub strict: bool,
    /// Only validate syntax, don't generate SQL
    pub syntax_only: bool,
}

/// Result of a compile operation
#[derive(Debug)]
pub enum CompileResult {
    /// Syntax validation passed, with the tree in s-expression form
    SyntaxValid(String),
    /// Generated query as JSON
    Success(serde_json::Value),
}

/// Execute a compile operation
pub fn execute_compile(options: &CompileOptions) -> Result<CompileResult, CliError> {
    let policy = if options.strict {
        FilterPolicy::Strict
    } else {
        FilterPolicy::Lenient
    };
    let factory = InterceptorFactory::new().with_policy(policy);

    let request = match (&options.query_string, &options.filter) {
        (Some(qs), _) => Request::from_query_string(qs),
        (None, Some(filter)) => Request::default().with_query_param(factory.param(), filter),
        (None, None) => return Err(CliError::NoFilter),
    };

    if options.syntax_only {
        let raw = request.query_param(factory.param()).ok_or(CliError::NoFilter)?;
        let ast = fql::compile(raw)?;
        return Ok(CompileResult::SyntaxValid(ast.to_string()));
    }

    let mut entity = Entity::new(&options.table, &options.alias);
    if !options.fields.is_empty() {
        entity = entity.with_fields(options.fields.iter().cloned());
    }

    let mut builder = entity.query_builder();
    factory.apply(&request, &mut builder, &entity)?;

    Ok(CompileResult::Success(query_to_json(&builder)))
}
