use std::collections::BTreeMap;

use crate::config::ConfigError;

/// Nested key/value mapping produced by evaluating a config file.
pub type Table = BTreeMap<String, Value>;

/// A configuration value.
///
/// Leaves of the source file are strings, integers, booleans or arrays;
/// blocks evaluate to tables.
///
/// # Examples
///
/// ```
/// use fql_lang::config::Value;
///
/// let mut ports = Value::Array(vec![Value::Integer(80)]);
/// ports.merge(Value::Array(vec![Value::Integer(443)])).unwrap();
/// assert_eq!(ports, Value::Array(vec![Value::Integer(80), Value::Integer(443)]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Boolean(bool),
    Array(Vec<Value>),
    Table(Table),
}

impl Value {
    /// Deep-merges `other` into `self`.
    ///
    /// Tables merge key by key, arrays concatenate, a table arriving where
    /// a non-table is stored is a [`ConfigError::PathConflict`], anything
    /// else is replaced by `other`.
    pub fn merge(&mut self, other: Value) -> Result<(), ConfigError> {
        merge_value(self, other, &mut Vec::new())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Human-readable type name, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Boolean(_) => "boolean",
            Value::Array(_) => "array",
            Value::Table(_) => "table",
        }
    }

    /// Converts the value into its JSON form.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Integer(n) => serde_json::Value::Number((*n).into()),
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Table(table) => serde_json::Value::Object(
                table
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

/// Deep-merges `right` into `left` with [`Value::merge`] semantics per key.
pub fn merge_tables(left: &mut Table, right: Table) -> Result<(), ConfigError> {
    merge_into(left, right, &mut Vec::new())
}

fn merge_into(
    left: &mut Table,
    right: Table,
    path: &mut Vec<String>,
) -> Result<(), ConfigError> {
    for (key, value) in right {
        path.push(key.clone());
        match left.get_mut(&key) {
            Some(existing) => merge_value(existing, value, path)?,
            None => {
                left.insert(key, value);
            }
        }
        path.pop();
    }
    Ok(())
}

fn merge_value(
    slot: &mut Value,
    other: Value,
    path: &mut Vec<String>,
) -> Result<(), ConfigError> {
    match (slot, other) {
        (Value::Table(left), Value::Table(right)) => merge_into(left, right, path)?,
        (Value::Array(left), Value::Array(right)) => left.extend(right),
        (existing, Value::Table(_)) => {
            return Err(ConfigError::PathConflict {
                path: path.join("."),
                found: existing.type_name(),
            });
        }
        (slot, other) => *slot = other,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_merge_overwrites() {
        let mut v = Value::Integer(1);
        v.merge(Value::String("two".into())).unwrap();
        assert_eq!(v, Value::String("two".into()));
    }

    #[test]
    fn test_table_merge_is_recursive() {
        let mut left = Table::new();
        left.insert("a".into(), Value::Integer(1));
        left.insert("tags".into(), Value::Array(vec![Value::String("x".into())]));

        let mut right = Table::new();
        right.insert("b".into(), Value::Integer(2));
        right.insert("tags".into(), Value::Array(vec![Value::String("y".into())]));

        let mut merged = Value::Table(left);
        merged.merge(Value::Table(right)).unwrap();

        let table = merged.as_table().unwrap();
        assert_eq!(table["a"], Value::Integer(1));
        assert_eq!(table["b"], Value::Integer(2));
        assert_eq!(
            table["tags"],
            Value::Array(vec![Value::String("x".into()), Value::String("y".into())])
        );
    }

    #[test]
    fn test_table_over_scalar_is_conflict() {
        let mut left = Table::new();
        left.insert("b".into(), Value::Integer(1));
        let mut inner = Table::new();
        inner.insert("c".into(), Value::Integer(2));
        let mut right = Table::new();
        right.insert("b".into(), Value::Table(inner));

        let mut a = Table::new();
        a.insert("a".into(), Value::Table(left));
        let mut b = Table::new();
        b.insert("a".into(), Value::Table(right));

        match merge_tables(&mut a, b) {
            Err(ConfigError::PathConflict { path, found }) => {
                assert_eq!(path, "a.b");
                assert_eq!(found, "integer");
            }
            other => panic!("Expected PathConflict, got {:?}", other),
        }
    }

    #[test]
    fn test_scalar_over_table_replaces() {
        let mut v = Value::Table(Table::new());
        v.merge(Value::Integer(3)).unwrap();
        assert_eq!(v, Value::Integer(3));
    }
}
