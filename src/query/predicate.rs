use std::fmt;

/// Binary comparison operators available on [`ExprFactory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
}

impl ComparisonOp {
    pub fn sql(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Neq => "<>",
            ComparisonOp::Gt => ">",
            ComparisonOp::Gte => ">=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Lte => "<=",
            ComparisonOp::Like => "LIKE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JunctionKind {
    And,
    Or,
}

impl JunctionKind {
    pub fn sql(self) -> &'static str {
        match self {
            JunctionKind::And => "AND",
            JunctionKind::Or => "OR",
        }
    }
}

/// A WHERE-clause predicate.
///
/// Predicates only ever reference columns and placeholders; bound values
/// live in the query builder's parameter table.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column <op> ?N`
    Comparison {
        column: String,
        op: ComparisonOp,
        placeholder: String,
    },
    /// `column [NOT] IN (?N, ?M, ...)`
    In {
        column: String,
        negated: bool,
        placeholders: Vec<String>,
    },
    /// `column IS [NOT] NULL`
    Null { column: String, negated: bool },
    /// Parts joined by AND/OR, kept in order
    Junction {
        kind: JunctionKind,
        parts: Vec<Predicate>,
    },
}

impl Predicate {
    /// Number of leaf predicates under this one.
    pub fn leaf_count(&self) -> usize {
        match self {
            Predicate::Junction { parts, .. } => parts.iter().map(Predicate::leaf_count).sum(),
            _ => 1,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Comparison {
                column,
                op,
                placeholder,
            } => write!(f, "{} {} {}", column, op.sql(), placeholder),
            Predicate::In {
                column,
                negated,
                placeholders,
            } => {
                let not = if *negated { "NOT " } else { "" };
                write!(f, "{} {}IN ({})", column, not, placeholders.join(", "))
            }
            Predicate::Null { column, negated } => {
                let not = if *negated { "NOT " } else { "" };
                write!(f, "{} IS {}NULL", column, not)
            }
            Predicate::Junction { kind, parts } => match parts.as_slice() {
                // Neutral elements: an empty AND matches everything, an empty OR nothing
                [] => match kind {
                    JunctionKind::And => f.write_str("1 = 1"),
                    JunctionKind::Or => f.write_str("1 = 0"),
                },
                [single] => write!(f, "{}", single),
                parts => {
                    let rendered: Vec<String> = parts.iter().map(|p| p.to_string()).collect();
                    let separator = format!(" {} ", kind.sql());
                    write!(f, "({})", rendered.join(&separator))
                }
            },
        }
    }
}

/// Builds predicates for a query builder, one method per operation.
///
/// Methods take the column expression (`alias.field`) and placeholder
/// names; they never see bound values.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExprFactory;

impl ExprFactory {
    fn compare(column: &str, op: ComparisonOp, placeholder: &str) -> Predicate {
        Predicate::Comparison {
            column: column.to_string(),
            op,
            placeholder: placeholder.to_string(),
        }
    }

    pub fn eq(&self, column: &str, placeholder: &str) -> Predicate {
        Self::compare(column, ComparisonOp::Eq, placeholder)
    }

    pub fn neq(&self, column: &str, placeholder: &str) -> Predicate {
        Self::compare(column, ComparisonOp::Neq, placeholder)
    }

    pub fn gt(&self, column: &str, placeholder: &str) -> Predicate {
        Self::compare(column, ComparisonOp::Gt, placeholder)
    }

    pub fn gte(&self, column: &str, placeholder: &str) -> Predicate {
        Self::compare(column, ComparisonOp::Gte, placeholder)
    }

    pub fn lt(&self, column: &str, placeholder: &str) -> Predicate {
        Self::compare(column, ComparisonOp::Lt, placeholder)
    }

    pub fn lte(&self, column: &str, placeholder: &str) -> Predicate {
        Self::compare(column, ComparisonOp::Lte, placeholder)
    }

    pub fn like(&self, column: &str, placeholder: &str) -> Predicate {
        Self::compare(column, ComparisonOp::Like, placeholder)
    }

    pub fn in_list(&self, column: &str, placeholders: &[String]) -> Predicate {
        Predicate::In {
            column: column.to_string(),
            negated: false,
            placeholders: placeholders.to_vec(),
        }
    }

    pub fn not_in(&self, column: &str, placeholders: &[String]) -> Predicate {
        Predicate::In {
            column: column.to_string(),
            negated: true,
            placeholders: placeholders.to_vec(),
        }
    }

    pub fn is_null(&self, column: &str) -> Predicate {
        Predicate::Null {
            column: column.to_string(),
            negated: false,
        }
    }

    pub fn is_not_null(&self, column: &str) -> Predicate {
        Predicate::Null {
            column: column.to_string(),
            negated: true,
        }
    }

    pub fn and_x(&self, parts: Vec<Predicate>) -> Predicate {
        Predicate::Junction {
            kind: JunctionKind::And,
            parts,
        }
    }

    pub fn or_x(&self, parts: Vec<Predicate>) -> Predicate {
        Predicate::Junction {
            kind: JunctionKind::Or,
            parts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_nested_junction() {
        let expr = ExprFactory;
        let predicate = expr.and_x(vec![
            expr.eq("u.name", "?1"),
            expr.or_x(vec![expr.gt("u.age", "?2"), expr.is_null("u.deleted_at")]),
        ]);
        assert_eq!(
            predicate.to_string(),
            "(u.name = ?1 AND (u.age > ?2 OR u.deleted_at IS NULL))"
        );
        assert_eq!(predicate.leaf_count(), 3);
    }

    #[test]
    fn test_render_in_list() {
        let expr = ExprFactory;
        let placeholders = vec!["?1".to_string(), "?2".to_string()];
        assert_eq!(
            expr.not_in("u.id", &placeholders).to_string(),
            "u.id NOT IN (?1, ?2)"
        );
    }
}
