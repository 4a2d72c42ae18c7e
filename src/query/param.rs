use std::fmt;

use rust_decimal::Decimal;

/// A value bound to a positional placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Integer(i64),
    /// Exact decimal, kept out of floating point
    Decimal(Decimal),
    String(String),
    Boolean(bool),
}

impl Param {
    /// JSON form of the parameter. Decimals are emitted as strings so no
    /// precision is lost.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Param::Integer(n) => serde_json::Value::Number((*n).into()),
            Param::Decimal(d) => serde_json::Value::String(d.to_string()),
            Param::String(s) => serde_json::Value::String(s.clone()),
            Param::Boolean(b) => serde_json::Value::Bool(*b),
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Integer(n) => write!(f, "{}", n),
            Param::Decimal(d) => write!(f, "{}", d),
            Param::String(s) => write!(f, "{:?}", s),
            Param::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<i64> for Param {
    fn from(n: i64) -> Self {
        Param::Integer(n)
    }
}

impl From<Decimal> for Param {
    fn from(d: Decimal) -> Self {
        Param::Decimal(d)
    }
}

impl From<&str> for Param {
    fn from(s: &str) -> Self {
        Param::String(s.to_string())
    }
}

impl From<String> for Param {
    fn from(s: String) -> Self {
        Param::String(s)
    }
}

impl From<bool> for Param {
    fn from(b: bool) -> Self {
        Param::Boolean(b)
    }
}
