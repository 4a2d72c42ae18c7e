use std::fmt;

use rust_decimal::Decimal;

use crate::position::Position;
use crate::query::{ExprFactory, Param, Predicate};

/// Operand value written in a filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Decimal(Decimal),
    String(String),
    Boolean(bool),
    Null,
    List(Vec<Literal>),
}

impl Literal {
    /// The bindable parameter for a scalar literal. `Null` and lists have none.
    pub fn to_param(&self) -> Option<Param> {
        match self {
            Literal::Integer(n) => Some(Param::Integer(*n)),
            Literal::Decimal(d) => Some(Param::Decimal(*d)),
            Literal::String(s) => Some(Param::String(s.clone())),
            Literal::Boolean(b) => Some(Param::Boolean(*b)),
            Literal::Null | Literal::List(_) => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(n) => write!(f, "{}", n),
            Literal::Decimal(d) => write!(f, "{}", d),
            Literal::String(s) => write!(f, "{:?}", s),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Null => f.write_str("null"),
            Literal::List(items) => {
                let items: Vec<String> = items.iter().map(|i| i.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
        }
    }
}

/// Operand leaf: a field and the value it is compared against.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValue {
    pub key: String,
    pub value: Literal,
}

/// Operators a filter can compile to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    AndX,
    OrX,
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    In,
    NotIn,
    IsNull,
    IsNotNull,
}

/// Which [`ExprFactory`] method an operator compiles to.
///
/// Resolved statically from the operator; it is only called once the
/// interceptor has a column and placeholders to hand over.
#[derive(Debug, Clone, Copy)]
pub enum Invokable {
    /// `method(column, placeholder)`
    Compare(fn(&ExprFactory, &str, &str) -> Predicate),
    /// `method(column, placeholders)`
    Set(fn(&ExprFactory, &str, &[String]) -> Predicate),
    /// `method(column)`
    Check(fn(&ExprFactory, &str) -> Predicate),
    /// `method(children)`
    Combine(fn(&ExprFactory, Vec<Predicate>) -> Predicate),
}

impl Operator {
    /// SQL text for the operator.
    pub fn sql(self) -> &'static str {
        match self {
            Operator::AndX => "AND",
            Operator::OrX => "OR",
            Operator::Eq => "=",
            Operator::Neq => "<>",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Like => "LIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
        }
    }

    pub fn invokable(self) -> Invokable {
        match self {
            Operator::AndX => Invokable::Combine(ExprFactory::and_x),
            Operator::OrX => Invokable::Combine(ExprFactory::or_x),
            Operator::Eq => Invokable::Compare(ExprFactory::eq),
            Operator::Neq => Invokable::Compare(ExprFactory::neq),
            Operator::Gt => Invokable::Compare(ExprFactory::gt),
            Operator::Gte => Invokable::Compare(ExprFactory::gte),
            Operator::Lt => Invokable::Compare(ExprFactory::lt),
            Operator::Lte => Invokable::Compare(ExprFactory::lte),
            Operator::Like => Invokable::Compare(ExprFactory::like),
            Operator::In => Invokable::Set(ExprFactory::in_list),
            Operator::NotIn => Invokable::Set(ExprFactory::not_in),
            Operator::IsNull => Invokable::Check(ExprFactory::is_null),
            Operator::IsNotNull => Invokable::Check(ExprFactory::is_not_null),
        }
    }

    pub fn is_junction(self) -> bool {
        matches!(self, Operator::AndX | Operator::OrX)
    }
}

/// Operator node. Junctions have operator children; every other operator
/// has exactly one [`KeyValue`] child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExprNode {
    pub operator: Operator,
    pub position: Position,
}

impl ExprNode {
    pub fn new(operator: Operator, position: Position) -> Self {
        ExprNode { operator, position }
    }

    pub fn operator(&self) -> &'static str {
        self.operator.sql()
    }

    pub fn invokable(&self) -> Invokable {
        self.operator.invokable()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Expr(ExprNode),
    KeyValue(KeyValue),
}

impl Node {
    /// Operands carry no invokable.
    pub fn invokable(&self) -> Option<Invokable> {
        match self {
            Node::Expr(expr) => Some(expr.invokable()),
            Node::KeyValue(_) => None,
        }
    }
}

/// Filter syntax tree. The root is always an implicit `AndX`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    pub node: Node,
    pub children: Vec<Ast>,
}

impl Ast {
    pub fn root() -> Self {
        Ast::operator(Operator::AndX, Position::new(1, 1), vec![])
    }

    pub fn operator(operator: Operator, position: Position, children: Vec<Ast>) -> Self {
        Ast {
            node: Node::Expr(ExprNode::new(operator, position)),
            children,
        }
    }

    /// An operator applied to a single key/value operand.
    pub fn comparison(
        operator: Operator,
        position: Position,
        key: impl Into<String>,
        value: Literal,
    ) -> Self {
        let operand = Ast {
            node: Node::KeyValue(KeyValue {
                key: key.into(),
                value,
            }),
            children: vec![],
        };
        Ast::operator(operator, position, vec![operand])
    }

    /// The operator of this node, if it is not an operand.
    pub fn operator_kind(&self) -> Option<Operator> {
        match &self.node {
            Node::Expr(expr) => Some(expr.operator),
            Node::KeyValue(_) => None,
        }
    }

    pub fn push(&mut self, child: Ast) {
        self.children.push(child);
    }
}

/// S-expression form, e.g. `(AND (= name "foo") (IN id [1, 2]))`.
impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node {
            Node::KeyValue(kv) => match kv.value {
                Literal::Null => write!(f, "{}", kv.key),
                _ => write!(f, "{} {}", kv.key, kv.value),
            },
            Node::Expr(expr) => {
                write!(f, "({}", expr.operator())?;
                for child in &self.children {
                    write!(f, " {}", child)?;
                }
                f.write_str(")")
            }
        }
    }
}
