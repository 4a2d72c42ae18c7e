// tests/fql_parser_tests.rs

use fql_lang::fql::ast::{Ast, Literal, Node, Operator};
use fql_lang::fql::parser::{MAX_DEPTH, ParseError};
use fql_lang::fql::{FqlError, compile};
use rust_decimal::Decimal;

fn parse(input: &str) -> Ast {
    compile(input).unwrap_or_else(|e| panic!("Failed to parse {}: {}", input, e))
}

fn parse_err(input: &str) -> ParseError {
    match compile(input) {
        Err(FqlError::Parse(e)) => e,
        other => panic!("Expected parse error for {}, got {:?}", input, other),
    }
}

/// Operator and operand of a single top-level comparison.
fn single(input: &str) -> (Operator, String, Literal) {
    let ast = parse(input);
    assert_eq!(ast.children.len(), 1, "Expected one conjunct in {}", input);
    let comparison = &ast.children[0];
    match &comparison.children[0].node {
        Node::KeyValue(kv) => (
            comparison.operator_kind().unwrap(),
            kv.key.clone(),
            kv.value.clone(),
        ),
        other => panic!("Expected key/value operand, got {:?}", other),
    }
}

// ============================================================================
// Comparisons
// ============================================================================

#[test]
fn test_implicit_equality() {
    assert_eq!(
        single("name:foo"),
        (Operator::Eq, "name".into(), Literal::String("foo".into()))
    );
}

#[test]
fn test_explicit_operators() {
    let test_cases = vec![
        ("age:eq:30", Operator::Eq),
        ("age:ne:30", Operator::Neq),
        ("age:gt:30", Operator::Gt),
        ("age:gte:30", Operator::Gte),
        ("age:lt:30", Operator::Lt),
        ("age:lte:30", Operator::Lte),
        ("age:GTE:30", Operator::Gte),
    ];

    for (input, expected) in test_cases {
        let (op, key, value) = single(input);
        assert_eq!(op, expected, "Failed for input: {}", input);
        assert_eq!(key, "age");
        assert_eq!(value, Literal::Integer(30));
    }
}

#[test]
fn test_literal_types() {
    assert_eq!(single("a:'x y'").2, Literal::String("x y".into()));
    assert_eq!(single("a:-5").2, Literal::Integer(-5));
    assert_eq!(
        single("a:gt:12.50").2,
        Literal::Decimal(Decimal::new(1250, 2))
    );
    assert_eq!(single("a:true").2, Literal::Boolean(true));
    assert_eq!(single("a:FALSE").2, Literal::Boolean(false));
}

#[test]
fn test_quoted_keyword_is_a_value() {
    assert_eq!(
        single("name:'like'"),
        (Operator::Eq, "name".into(), Literal::String("like".into()))
    );
}

#[test]
fn test_like() {
    assert_eq!(
        single("email:like:%@example.com"),
        (
            Operator::Like,
            "email".into(),
            Literal::String("%@example.com".into())
        )
    );
}

#[test]
fn test_null_checks() {
    assert_eq!(single("deleted_at:null").0, Operator::IsNull);
    assert_eq!(single("deleted_at:eq:null").0, Operator::IsNull);
    assert_eq!(single("deleted_at:ne:null").0, Operator::IsNotNull);
}

// ============================================================================
// Lists
// ============================================================================

#[test]
fn test_list_is_in() {
    assert_eq!(
        single("id:[1,2,3]"),
        (
            Operator::In,
            "id".into(),
            Literal::List(vec![
                Literal::Integer(1),
                Literal::Integer(2),
                Literal::Integer(3)
            ])
        )
    );
    assert_eq!(single("id:eq:[1]").0, Operator::In);
    assert_eq!(single("id:ne:[1,2]").0, Operator::NotIn);
}

#[test]
fn test_like_list_becomes_or() {
    let ast = parse("name:like:[jo%,%son]");
    assert_eq!(
        ast.to_string(),
        r#"(AND (OR (LIKE name "jo%") (LIKE name "%son")))"#
    );
}

// ============================================================================
// Conjunctions and Groups
// ============================================================================

#[test]
fn test_root_is_implicit_and() {
    let ast = parse("a:1,b:2");
    assert_eq!(ast.operator_kind(), Some(Operator::AndX));
    assert_eq!(ast.children.len(), 2);
    assert_eq!(ast.to_string(), "(AND (= a 1) (= b 2))");
}

#[test]
fn test_explicit_groups_keep_order() {
    let ast = parse("status:active,or:[role:admin,and:[age:gte:18,verified:true]]");
    assert_eq!(
        ast.to_string(),
        r#"(AND (= status "active") (OR (= role "admin") (AND (>= age 18) (= verified true))))"#
    );
}

#[test]
fn test_expr_nodes_expose_operator_and_invokable() {
    let ast = parse("a:gt:1");
    let comparison = &ast.children[0];
    match &comparison.node {
        Node::Expr(expr) => assert_eq!(expr.operator(), ">"),
        other => panic!("Expected expression node, got {:?}", other),
    }
    assert!(comparison.node.invokable().is_some());
    assert!(comparison.children[0].node.invokable().is_none());
}

#[test]
fn test_nesting_limit() {
    let mut filter = "a:1".to_string();
    for _ in 0..MAX_DEPTH {
        filter = format!("or:[{}]", filter);
    }
    assert!(compile(&filter).is_ok());

    let too_deep = format!("or:[{}]", filter);
    assert!(matches!(
        parse_err(&too_deep),
        ParseError::TooDeep { max: MAX_DEPTH, .. }
    ));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_empty_filter() {
    assert_eq!(parse_err(""), ParseError::EmptyFilter);
    assert_eq!(parse_err("   "), ParseError::EmptyFilter);
}

#[test]
fn test_invalid_keys() {
    assert!(matches!(
        parse_err("u.name:foo"),
        ParseError::InvalidKey { .. }
    ));
    assert!(matches!(
        parse_err("1abc:foo"),
        ParseError::InvalidKey { .. }
    ));
    assert!(matches!(
        parse_err("name--x:foo"),
        ParseError::InvalidKey { .. }
    ));
}

#[test]
fn test_keyword_as_key_is_error() {
    assert!(matches!(
        parse_err("like:foo"),
        ParseError::UnexpectedToken { .. }
    ));
}

#[test]
fn test_list_not_allowed_for_ordering() {
    assert!(matches!(
        parse_err("age:gt:[1,2]"),
        ParseError::ListNotAllowed { .. }
    ));
}

#[test]
fn test_null_not_allowed() {
    assert!(matches!(
        parse_err("age:gt:null"),
        ParseError::NullNotAllowed { .. }
    ));
    assert!(matches!(
        parse_err("id:[1,null]"),
        ParseError::NullNotAllowed { .. }
    ));
}

#[test]
fn test_like_needs_string() {
    assert!(matches!(
        parse_err("age:like:10"),
        ParseError::LikeNeedsString { .. }
    ));
    assert!(matches!(
        parse_err("name:like:[a%,3]"),
        ParseError::LikeNeedsString { .. }
    ));
}

#[test]
fn test_structural_errors() {
    let test_cases = vec![
        "name",
        "name:",
        "name:foo,",
        "name:foo bar:baz",
        "id:[]",
        "id:[1,2",
        "or:[]",
        "or:a:1",
        "age:gt",
    ];

    for input in test_cases {
        assert!(compile(input).is_err(), "Expected error for input: {}", input);
    }
}

#[test]
fn test_eof_error_message() {
    assert_eq!(
        parse_err("name:"),
        ParseError::UnexpectedEof {
            expected: "value".into()
        }
    );
}
