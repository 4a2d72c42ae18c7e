// tests/config_tests.rs

use std::io::Write;

use fql_lang::config::{Config, ConfigError, Value};
use fql_lang::config::parser::ParseError;

fn strings(items: &[&str]) -> Value {
    Value::Array(items.iter().map(|s| Value::String(s.to_string())).collect())
}

// ============================================================================
// Lookup
// ============================================================================

#[test]
fn test_scalar_lookup() {
    let config: Config = r#"
[database]
host = "localhost"
port = 5432
ssl = false
"#
    .parse()
    .unwrap();

    assert_eq!(config.get_str("database.host"), Some("localhost"));
    assert_eq!(config.get_int("database.port"), Some(5432));
    assert_eq!(config.get_bool("database.ssl"), Some(false));
}

#[test]
fn test_missing_key_returns_none() {
    let config: Config = "[database]\nport = 1".parse().unwrap();

    assert!(config.get("nonexistent.path").is_none());
    assert!(config.get("database.host").is_none());
    assert!(config.get("database.port.deeper").is_none());
    assert!(config.get("").is_none());
}

#[test]
fn test_typed_getter_mismatch_is_none() {
    let config: Config = "[s]\nport = 80".parse().unwrap();
    assert_eq!(config.get_str("s.port"), None);
    assert_eq!(config.get_int("s.port"), Some(80));
}

#[test]
fn test_empty_input_gives_empty_mapping() {
    let config: Config = "".parse().unwrap();
    assert!(config.is_empty());
    assert!(config.get("anything").is_none());
    assert!(config.get("a.b.c").is_none());
}

#[test]
fn test_block_resolves_to_table() {
    let config: Config = "[a]\nx = 1\ny = 2".parse().unwrap();
    let table = config.get("a").and_then(Value::as_table).unwrap();
    assert_eq!(table.len(), 2);
}

// ============================================================================
// Nesting and Merging
// ============================================================================

#[test]
fn test_dotted_blocks_nest() {
    let config: Config = r#"
[app]
name = "api"
[app.cache.redis]
port = 6379
"#
    .parse()
    .unwrap();

    assert_eq!(config.get_str("app.name"), Some("api"));
    assert_eq!(config.get_int("app.cache.redis.port"), Some(6379));
    assert!(config.get("app.cache").and_then(Value::as_table).is_some());
}

#[test]
fn test_empty_block_creates_empty_table() {
    let config: Config = "[a]\n[b]\nx = 1".parse().unwrap();
    assert_eq!(
        config.get("a").and_then(Value::as_table).map(|t| t.len()),
        Some(0)
    );
}

#[test]
fn test_repeated_block_unions_keys() {
    let config: Config = r#"
[server.http]
host = "0.0.0.0"
[other]
x = 1
[server.http]
port = 8080
"#
    .parse()
    .unwrap();

    assert_eq!(config.get_str("server.http.host"), Some("0.0.0.0"));
    assert_eq!(config.get_int("server.http.port"), Some(8080));
}

#[test]
fn test_duplicate_scalar_keeps_last() {
    let config: Config = "[s]\nlevel = 'info'\nlevel = 'debug'".parse().unwrap();
    assert_eq!(config.get_str("s.level"), Some("debug"));
}

#[test]
fn test_duplicate_array_concatenates() {
    let config: Config = "[s]\ntags = ['a']\n[s]\ntags = ['b', 'c']".parse().unwrap();
    assert_eq!(config.get("s.tags"), Some(&strings(&["a", "b", "c"])));
}

#[test]
fn test_block_over_scalar_is_conflict() {
    let result = "[a]\nb = 1\n[a.b]\nc = 2".parse::<Config>();
    match result {
        Err(ConfigError::PathConflict { path, found }) => {
            assert_eq!(path, "a.b");
            assert_eq!(found, "integer");
        }
        other => panic!("Expected PathConflict, got {:?}", other),
    }
}

#[test]
fn test_merge_configs() {
    let mut base: Config = "[app]\nname = 'base'\nplugins = ['auth']\ndebug = false"
        .parse()
        .unwrap();
    let overlay: Config = "[app]\nname = 'prod'\nplugins = ['metrics']\n[extra]\nx = 1"
        .parse()
        .unwrap();

    base.merge(overlay).unwrap();

    assert_eq!(base.get_str("app.name"), Some("prod"));
    assert_eq!(base.get("app.plugins"), Some(&strings(&["auth", "metrics"])));
    assert_eq!(base.get_bool("app.debug"), Some(false));
    assert_eq!(base.get_int("extra.x"), Some(1));
}

// ============================================================================
// Files
// ============================================================================

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_all_merges_in_order() {
    let first = write_config("[db]\nhost = 'a'\nreplicas = ['r1']");
    let second = write_config("[db]\nhost = 'b'\nreplicas = ['r2']");

    let config = Config::load_all([first.path(), second.path()]).unwrap();

    assert_eq!(config.get_str("db.host"), Some("b"));
    assert_eq!(config.get("db.replicas"), Some(&strings(&["r1", "r2"])));
}

#[test]
fn test_load_missing_file() {
    let result = Config::load("/definitely/not/here.conf");
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[test]
fn test_load_reports_parse_error() {
    let file = write_config("stray = 1");
    let result = Config::load(file.path());
    assert!(matches!(
        result,
        Err(ConfigError::Parse(ParseError::PropertyOutsideBlock { .. }))
    ));
}

// ============================================================================
// JSON
// ============================================================================

#[test]
fn test_to_json() {
    let config: Config = "[a.b]\nx = 1\nys = ['p']\nflag = true".parse().unwrap();
    assert_eq!(
        config.to_json(),
        serde_json::json!({"a": {"b": {"x": 1, "ys": ["p"], "flag": true}}})
    );
}

#[test]
fn test_load_all_block_over_scalar_is_conflict() {
    let first = write_config("[a]\nb = 1");
    let second = write_config("[a.b]\nc = 2");

    match Config::load_all([first.path(), second.path()]) {
        Err(ConfigError::PathConflict { path, found }) => {
            assert_eq!(path, "a.b");
            assert_eq!(found, "integer");
        }
        other => panic!("Expected PathConflict, got {:?}", other),
    }
}

#[test]
fn test_load_all_scalar_over_block_replaces() {
    let first = write_config("[a.b]\nc = 2");
    let second = write_config("[a]\nb = 1");

    let config = Config::load_all([first.path(), second.path()]).unwrap();
    assert_eq!(config.get_int("a.b"), Some(1));
}
