use crate::config::ConfigError;
use crate::config::ast::{Ast, NodeKind, Visitor};
use crate::config::value::Value;

/// What a single node resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// The root sentinel resolves to nothing
    Nothing,
    /// A block header split into its nested key path
    Path(Vec<String>),
    /// An assignment as a one-entry mapping
    Entry(String, Value),
    /// A literal or array value
    Value(Value),
}

/// Resolves individual nodes into key paths, entries and values.
///
/// It does not descend into block children; [`crate::config::Config`]
/// drives that walk.
#[derive(Debug, Default)]
pub struct Resolver;

impl Resolver {
    pub fn new() -> Self {
        Resolver
    }

    fn resolve_value(&mut self, ast: &Ast) -> Result<Value, ConfigError> {
        match ast.accept(self)? {
            Resolved::Value(value) => Ok(value),
            _ => Err(malformed(ast, "expected a value node")),
        }
    }
}

impl Visitor for Resolver {
    type Output = Result<Resolved, ConfigError>;

    fn visit_root(&mut self, _ast: &Ast) -> Self::Output {
        Ok(Resolved::Nothing)
    }

    fn visit_block(&mut self, ast: &Ast) -> Self::Output {
        let header = ast
            .node
            .value
            .as_str()
            .ok_or_else(|| malformed(ast, "block header is not a string"))?;
        Ok(Resolved::Path(header.split('.').map(str::to_string).collect()))
    }

    fn visit_assignment(&mut self, ast: &Ast) -> Self::Output {
        let [key, value] = ast.children.as_slice() else {
            return Err(malformed(ast, "assignment needs a key and a value"));
        };

        let key = match (&key.node.kind, &key.node.value) {
            (NodeKind::Identifier, Value::String(name)) => name.clone(),
            _ => return Err(malformed(key, "assignment key is not an identifier")),
        };
        let value = self.resolve_value(value)?;

        Ok(Resolved::Entry(key, value))
    }

    fn visit_literal(&mut self, ast: &Ast) -> Self::Output {
        Ok(Resolved::Value(ast.node.value.clone()))
    }

    fn visit_array(&mut self, ast: &Ast) -> Self::Output {
        let items = ast
            .children
            .iter()
            .map(|child| self.resolve_value(child))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Resolved::Value(Value::Array(items)))
    }
}

fn malformed(ast: &Ast, reason: &str) -> ConfigError {
    ConfigError::MalformedTree {
        reason: reason.to_string(),
        line: ast.node.position.line,
        column: ast.node.position.column,
    }
}
