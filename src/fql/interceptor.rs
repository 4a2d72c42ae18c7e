use std::collections::BTreeMap;

use thiserror::Error;

use crate::fql::ast::{Ast, Invokable, KeyValue, Literal, Node};
use crate::query::{ExprFactory, Param, Predicate, QueryBuilder};

/// Something a filter can be compiled against.
///
/// The alias prefixes every generated column reference.
pub trait Queryable {
    fn alias(&self) -> &str;

    /// Whether `field` may be filtered on. Defaults to any field.
    fn allows_field(&self, field: &str) -> bool {
        let _ = field;
        true
    }
}

/// A table with a fixed alias and an optional allow-list of filterable fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    table: String,
    alias: String,
    fields: Option<Vec<String>>,
}

impl Entity {
    pub fn new(table: impl Into<String>, alias: impl Into<String>) -> Self {
        Entity {
            table: table.into(),
            alias: alias.into(),
            fields: None,
        }
    }

    /// Restricts filtering to the given fields.
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// A fresh query builder over this entity's table and alias.
    pub fn query_builder(&self) -> QueryBuilder {
        QueryBuilder::new(&self.table, &self.alias)
    }
}

impl Queryable for Entity {
    fn alias(&self) -> &str {
        &self.alias
    }

    fn allows_field(&self, field: &str) -> bool {
        self.fields
            .as_ref()
            .is_none_or(|fields| fields.iter().any(|f| f == field))
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterceptError {
    #[error("Field '{0}' cannot be filtered on")]
    UnknownField(String),

    #[error("Malformed filter tree: {0}")]
    MalformedTree(String),
}

/// Compiles a parsed filter into predicates on a query builder.
///
/// Values are bound as positional parameters; the SQL only ever contains
/// `alias.key` column references and `?N` placeholders. Numbering starts
/// after any parameter already bound on the builder.
pub struct Interceptor<'a, E: Queryable + ?Sized> {
    ast: Ast,
    builder: &'a mut QueryBuilder,
    entity: &'a E,
}

impl<'a, E: Queryable + ?Sized> Interceptor<'a, E> {
    pub fn new(ast: Ast, builder: &'a mut QueryBuilder, entity: &'a E) -> Self {
        Interceptor {
            ast,
            builder,
            entity,
        }
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// Appends the compiled filter with `and_where` and binds its parameters.
    ///
    /// On error the builder is left untouched.
    pub fn intercept(self) -> Result<&'a mut QueryBuilder, InterceptError> {
        let mut codegen = Codegen {
            entity: self.entity,
            expr: self.builder.expr(),
            next_index: self.builder.next_parameter_index(),
            bindings: BTreeMap::new(),
        };
        let predicate = codegen.compile(&self.ast)?;

        log::debug!(
            "fql compiled {} predicates with {} bound parameters",
            predicate.leaf_count(),
            codegen.bindings.len()
        );

        for (index, value) in codegen.bindings {
            self.builder.set_parameter(index, value);
        }
        self.builder.and_where(predicate);
        Ok(self.builder)
    }
}

/// Tree walk state: the placeholder counter and the values bound so far.
struct Codegen<'e, E: Queryable + ?Sized> {
    entity: &'e E,
    expr: ExprFactory,
    next_index: usize,
    bindings: BTreeMap<usize, Param>,
}

impl<E: Queryable + ?Sized> Codegen<'_, E> {
    fn compile(&mut self, ast: &Ast) -> Result<Predicate, InterceptError> {
        let Some(invokable) = ast.node.invokable() else {
            return Err(InterceptError::MalformedTree(
                "operand found outside of an operator".to_string(),
            ));
        };

        match invokable {
            Invokable::Combine(combine) => {
                let parts = ast
                    .children
                    .iter()
                    .map(|child| self.compile(child))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(combine(&self.expr, parts))
            }
            Invokable::Compare(compare) => {
                let operand = operand(ast)?;
                let column = self.column(&operand.key)?;
                let param = operand.value.to_param().ok_or_else(|| {
                    InterceptError::MalformedTree(format!(
                        "comparison on '{}' has no scalar value",
                        operand.key
                    ))
                })?;
                let placeholder = self.bind(param);
                Ok(compare(&self.expr, &column, &placeholder))
            }
            Invokable::Set(set) => {
                let operand = operand(ast)?;
                let column = self.column(&operand.key)?;
                let Literal::List(items) = &operand.value else {
                    return Err(InterceptError::MalformedTree(format!(
                        "set operation on '{}' has no list value",
                        operand.key
                    )));
                };
                let placeholders = items
                    .iter()
                    .map(|item| {
                        item.to_param().map(|param| self.bind(param)).ok_or_else(|| {
                            InterceptError::MalformedTree(format!(
                                "list for '{}' holds a non-scalar value",
                                operand.key
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(set(&self.expr, &column, &placeholders))
            }
            Invokable::Check(check) => {
                let operand = operand(ast)?;
                let column = self.column(&operand.key)?;
                Ok(check(&self.expr, &column))
            }
        }
    }

    fn column(&self, key: &str) -> Result<String, InterceptError> {
        if !self.entity.allows_field(key) {
            return Err(InterceptError::UnknownField(key.to_string()));
        }
        Ok(format!("{}.{}", self.entity.alias(), key))
    }

    /// Stores `param` under the next free index and returns its placeholder.
    fn bind(&mut self, param: Param) -> String {
        let index = self.next_index;
        self.next_index += 1;
        self.bindings.insert(index, param);
        format!("?{}", index)
    }
}

/// The single key/value child of a comparison node.
fn operand(ast: &Ast) -> Result<&KeyValue, InterceptError> {
    match ast.children.as_slice() {
        [Ast {
            node: Node::KeyValue(kv),
            ..
        }] => Ok(kv),
        _ => Err(InterceptError::MalformedTree(
            "comparison needs exactly one key/value operand".to_string(),
        )),
    }
}
