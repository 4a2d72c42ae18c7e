// tests/cli_tests.rs
#![cfg(feature = "cli")]

use fql_lang::cli::{
    CliError, CompileOptions, CompileResult, DumpOptions, DumpResult, execute_compile,
    execute_dump,
};
use serde_json::json;

fn compile_options(filter: &str) -> CompileOptions {
    CompileOptions {
        filter: Some(filter.to_string()),
        table: "users".into(),
        alias: "u".into(),
        ..Default::default()
    }
}

#[test]
fn test_compile_outputs_sql_and_parameters() {
    let result = execute_compile(&compile_options("name:foo,id:[1,2]")).unwrap();
    match result {
        CompileResult::Success(output) => assert_eq!(
            output,
            json!({
                "sql": "SELECT u FROM users u WHERE (u.name = ?1 AND u.id IN (?2, ?3))",
                "parameters": {"1": "foo", "2": 1, "3": 2}
            })
        ),
        other => panic!("Expected success, got {:?}", other),
    }
}

#[test]
fn test_compile_from_query_string() {
    let options = CompileOptions {
        query_string: Some("filter=price:lte:9.99".into()),
        ..compile_options("ignored:1")
    };
    match execute_compile(&options).unwrap() {
        CompileResult::Success(output) => {
            assert_eq!(output["parameters"]["1"], json!("9.99"));
        }
        other => panic!("Expected success, got {:?}", other),
    }
}

#[test]
fn test_compile_syntax_only() {
    let options = CompileOptions {
        syntax_only: true,
        ..compile_options("a:gt:1")
    };
    match execute_compile(&options).unwrap() {
        CompileResult::SyntaxValid(tree) => assert_eq!(tree, "(AND (> a 1))"),
        other => panic!("Expected syntax result, got {:?}", other),
    }
}

#[test]
fn test_compile_strict_and_lenient() {
    let lenient = execute_compile(&compile_options("a:(")).unwrap();
    match lenient {
        CompileResult::Success(output) => assert_eq!(output["sql"], json!("SELECT u FROM users u")),
        other => panic!("Expected success, got {:?}", other),
    }

    let strict = CompileOptions {
        strict: true,
        ..compile_options("a:(")
    };
    let err = execute_compile(&strict).unwrap_err();
    assert!(matches!(err, CliError::Filter(_)));
    assert!(err.to_string().contains("Invalid filter"));
}

#[test]
fn test_compile_field_allow_list() {
    let options = CompileOptions {
        fields: vec!["name".into()],
        ..compile_options("secret:1")
    };
    assert!(execute_compile(&options).is_err());
}

#[test]
fn test_compile_without_filter() {
    let options = CompileOptions {
        filter: None,
        ..compile_options("")
    };
    assert!(matches!(execute_compile(&options), Err(CliError::NoFilter)));
}

#[test]
fn test_dump_from_input() {
    let options = DumpOptions {
        input: Some("[a]\nx = 1\n[a.b]\nys = ['p', 'q']".into()),
        ..Default::default()
    };
    match execute_dump(&options).unwrap() {
        DumpResult::Success(output) => {
            assert_eq!(output, json!({"a": {"x": 1, "b": {"ys": ["p", "q"]}}}))
        }
        other => panic!("Expected success, got {:?}", other),
    }
}

#[test]
fn test_dump_get_key() {
    let options = DumpOptions {
        input: Some("[a]\nx = 1".into()),
        get: Some("a.x".into()),
        ..Default::default()
    };
    match execute_dump(&options).unwrap() {
        DumpResult::Success(output) => assert_eq!(output, json!(1)),
        other => panic!("Expected success, got {:?}", other),
    }

    let missing = DumpOptions {
        input: Some("[a]\nx = 1".into()),
        get: Some("a.y".into()),
        ..Default::default()
    };
    assert!(matches!(
        execute_dump(&missing),
        Err(CliError::MissingKey(key)) if key == "a.y"
    ));
}

#[test]
fn test_dump_reports_errors() {
    let options = DumpOptions {
        input: Some("x = 1".into()),
        ..Default::default()
    };
    assert!(matches!(execute_dump(&options), Err(CliError::Config(_))));

    assert!(matches!(
        execute_dump(&DumpOptions::default()),
        Err(CliError::NoInput)
    ));
}
