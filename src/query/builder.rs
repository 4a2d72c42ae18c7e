use std::collections::BTreeMap;

use crate::query::{
    param::Param,
    predicate::{ExprFactory, JunctionKind, Predicate},
};

/// Minimal SELECT builder with positional parameters.
///
/// Placeholders are written `?N`; the value for each lives in
/// [`QueryBuilder::parameters`] under index `N`.
///
/// # Examples
///
/// ```
/// use fql_lang::query::{Param, QueryBuilder};
///
/// let mut qb = QueryBuilder::new("users", "u");
/// let predicate = qb.expr().eq("u.scope", "?1");
/// qb.and_where(predicate).set_parameter(1, Param::from("public"));
///
/// assert_eq!(qb.to_sql(), "SELECT u FROM users u WHERE u.scope = ?1");
/// assert_eq!(qb.next_parameter_index(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QueryBuilder {
    table: String,
    alias: String,
    where_clause: Option<Predicate>,
    parameters: BTreeMap<usize, Param>,
}

impl QueryBuilder {
    pub fn new(table: impl Into<String>, alias: impl Into<String>) -> Self {
        QueryBuilder {
            table: table.into(),
            alias: alias.into(),
            where_clause: None,
            parameters: BTreeMap::new(),
        }
    }

    pub fn expr(&self) -> ExprFactory {
        ExprFactory
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Appends `predicate` to the WHERE clause with AND.
    pub fn and_where(&mut self, predicate: Predicate) -> &mut Self {
        self.combine(JunctionKind::And, predicate);
        self
    }

    /// Appends `predicate` to the WHERE clause with OR.
    pub fn or_where(&mut self, predicate: Predicate) -> &mut Self {
        self.combine(JunctionKind::Or, predicate);
        self
    }

    fn combine(&mut self, kind: JunctionKind, predicate: Predicate) {
        self.where_clause = Some(match self.where_clause.take() {
            None => predicate,
            Some(Predicate::Junction { kind: existing, mut parts }) if existing == kind => {
                parts.push(predicate);
                Predicate::Junction { kind, parts }
            }
            Some(existing) => Predicate::Junction {
                kind,
                parts: vec![existing, predicate],
            },
        });
    }

    pub fn set_parameter(&mut self, index: usize, value: Param) -> &mut Self {
        self.parameters.insert(index, value);
        self
    }

    /// First placeholder index not yet bound.
    pub fn next_parameter_index(&self) -> usize {
        self.parameters
            .last_key_value()
            .map_or(1, |(index, _)| index + 1)
    }

    pub fn parameters(&self) -> &BTreeMap<usize, Param> {
        &self.parameters
    }

    pub fn parameter(&self, index: usize) -> Option<&Param> {
        self.parameters.get(&index)
    }

    pub fn where_clause(&self) -> Option<&Predicate> {
        self.where_clause.as_ref()
    }

    pub fn to_sql(&self) -> String {
        let mut sql = format!("SELECT {} FROM {} {}", self.alias, self.table, self.alias);
        if let Some(predicate) = &self.where_clause {
            sql.push_str(" WHERE ");
            sql.push_str(&predicate.to_string());
        }
        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and_where_flattens() {
        let mut qb = QueryBuilder::new("users", "u");
        let expr = qb.expr();
        qb.and_where(expr.eq("u.a", "?1"))
            .and_where(expr.eq("u.b", "?2"))
            .and_where(expr.eq("u.c", "?3"));

        assert_eq!(
            qb.to_sql(),
            "SELECT u FROM users u WHERE (u.a = ?1 AND u.b = ?2 AND u.c = ?3)"
        );
    }

    #[test]
    fn test_or_where_wraps_conjunction() {
        let mut qb = QueryBuilder::new("users", "u");
        let expr = qb.expr();
        qb.and_where(expr.eq("u.a", "?1"))
            .and_where(expr.eq("u.b", "?2"))
            .or_where(expr.is_null("u.c"));

        assert_eq!(
            qb.where_clause().unwrap().to_string(),
            "((u.a = ?1 AND u.b = ?2) OR u.c IS NULL)"
        );
    }

    #[test]
    fn test_next_parameter_index_skips_bound() {
        let mut qb = QueryBuilder::new("villages", "v");
        assert_eq!(qb.next_parameter_index(), 1);
        qb.set_parameter(3, Param::Integer(7));
        assert_eq!(qb.next_parameter_index(), 4);
    }
}
