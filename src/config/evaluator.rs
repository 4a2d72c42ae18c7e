use std::{fs, path::Path, str::FromStr};

use crate::config::{
    ConfigError,
    ast::{Ast, NodeKind},
    lexer::Lexer,
    parser::Parser,
    value::{Table, Value, merge_tables},
    visitor::{Resolved, Resolver},
};

/// Evaluated configuration: a nested mapping built from one or more files.
///
/// A `Config` is immutable once built and can be shared across threads.
///
/// # Examples
///
/// ```
/// use fql_lang::config::Config;
///
/// let config: Config = "[database]\nhost = 'localhost'\nport = 5432".parse().unwrap();
/// assert_eq!(config.get_str("database.host"), Some("localhost"));
/// assert_eq!(config.get_int("database.port"), Some(5432));
/// assert!(config.get("database.user").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    root: Table,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lexes, parses and evaluates a config source.
    pub fn from_source(input: &str) -> Result<Self, ConfigError> {
        let mut lexer = Lexer::new(input);
        lexer.lex()?;
        let ast = Parser::new(lexer.into_tokens()).parse()?;
        Self::from_ast(&ast)
    }

    /// Evaluates an already parsed tree.
    ///
    /// Blocks set the current key path and ensure a table exists there;
    /// assignments are deep-merged into the table at the current path.
    pub fn from_ast(ast: &Ast) -> Result<Self, ConfigError> {
        let mut config = Config::new();
        let mut resolver = Resolver::new();
        let mut current: Vec<String> = vec![];

        for child in &ast.children {
            if child.kind() == NodeKind::Block {
                current = match child.accept(&mut resolver)? {
                    Resolved::Path(path) => path,
                    other => return Err(unexpected_resolution(child, &other)),
                };
                config.table_at(&current)?;

                for property in &child.children {
                    config.assign(&mut resolver, &current, property)?;
                }
            } else {
                config.assign(&mut resolver, &current, child)?;
            }
        }

        Ok(config)
    }

    /// Reads and evaluates a single file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loading config from {}", path.display());
        Self::from_source(&source)
    }

    /// Loads every file in order and merges them, later files winning.
    pub fn load_all<I, P>(paths: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut config = Config::new();
        for path in paths {
            config.merge(Self::load(path)?)?;
        }
        Ok(config)
    }

    /// Deep-merges `other` into this config.
    ///
    /// Scalars from `other` replace existing ones, arrays are concatenated.
    /// A block in `other` landing on a key that holds a scalar or an array is
    /// a [`ConfigError::PathConflict`], the same as within a single file.
    pub fn merge(&mut self, other: Config) -> Result<(), ConfigError> {
        merge_tables(&mut self.root, other.root)
    }

    /// Looks up a dotted key path such as `"database.replica.host"`.
    ///
    /// Returns `None` when any segment is missing; never fails.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut value = self.root.get(first)?;
        for segment in segments {
            value = value.as_table()?.get(segment)?;
        }
        Some(value)
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    pub fn get_int(&self, path: &str) -> Option<i64> {
        self.get(path).and_then(Value::as_int)
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(Value::as_bool)
    }

    pub fn get_array(&self, path: &str) -> Option<&[Value]> {
        self.get(path).and_then(Value::as_array)
    }

    /// The top-level mapping.
    pub fn root(&self) -> &Table {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        Value::Table(self.root.clone()).to_json()
    }

    fn assign(
        &mut self,
        resolver: &mut Resolver,
        path: &[String],
        property: &Ast,
    ) -> Result<(), ConfigError> {
        let (key, value) = match property.accept(resolver)? {
            Resolved::Entry(key, value) => (key, value),
            other => return Err(unexpected_resolution(property, &other)),
        };

        let mut entry = Table::new();
        entry.insert(key, value);
        merge_tables(self.table_at(path)?, entry)
    }

    /// Returns the table at `path`, creating empty tables along the way.
    fn table_at(&mut self, path: &[String]) -> Result<&mut Table, ConfigError> {
        let mut table = &mut self.root;
        for (depth, segment) in path.iter().enumerate() {
            let slot = table
                .entry(segment.clone())
                .or_insert_with(|| Value::Table(Table::new()));
            table = match slot {
                Value::Table(inner) => inner,
                other => {
                    return Err(ConfigError::PathConflict {
                        path: path[..=depth].join("."),
                        found: other.type_name(),
                    });
                }
            };
        }
        Ok(table)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Config::from_source(s)
    }
}

fn unexpected_resolution(ast: &Ast, resolved: &Resolved) -> ConfigError {
    ConfigError::MalformedTree {
        reason: format!("{:?} node resolved to {:?}", ast.kind(), resolved),
        line: ast.node.position.line,
        column: ast.node.position.column,
    }
}
