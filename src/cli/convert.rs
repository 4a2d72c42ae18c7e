//! JSON views of compiled queries and configs

use serde_json::{Map, json};

use crate::{Config, QueryBuilder};

/// `{"sql": ..., "parameters": {"1": ..., ...}}`
pub fn query_to_json(builder: &QueryBuilder) -> serde_json::Value {
    let parameters: Map<String, serde_json::Value> = builder
        .parameters()
        .iter()
        .map(|(index, param)| (index.to_string(), param.to_json()))
        .collect();

    json!({
        "sql": builder.to_sql(),
        "parameters": parameters,
    })
}

pub fn config_to_json(config: &Config) -> serde_json::Value {
    config.to_json()
}
