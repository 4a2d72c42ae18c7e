//! Query builder used as the target of FQL code generation.
//!
//! Only what the interceptor and calling repositories need: a single-table
//! SELECT, a composable WHERE clause and a positional parameter table.

pub mod builder;
pub mod param;
pub mod predicate;

pub use builder::QueryBuilder;
pub use param::Param;
pub use predicate::{ComparisonOp, ExprFactory, JunctionKind, Predicate};
