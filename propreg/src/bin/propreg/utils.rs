use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::Path;

use propreg::RecordDraft;

/// Reads a JSON or TOML map of field values. TOML is chosen by the `.toml` extension.
pub fn load_field_map(path: &Path) -> Result<Map<String, Value>> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
        let table: toml::Table = toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
        table
            .into_iter()
            .map(|(key, value)| Ok((key.clone(), toml_scalar(&key, value)?)))
            .collect()
    } else {
        match serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))? {
            Value::Object(map) => Ok(map),
            other => anyhow::bail!("{} must contain a JSON object, found {}", path.display(), json_kind(&other)),
        }
    }
}

/// Loads a file straight into a draft.
pub fn load_draft(path: &Path) -> Result<RecordDraft> {
    let map = load_field_map(path)?;
    RecordDraft::from_json_map(&map).with_context(|| format!("Invalid fields in {}", path.display()))
}

fn toml_scalar(key: &str, value: toml::Value) -> Result<Value> {
    Ok(match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::String(f.to_string()),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => {
            anyhow::bail!("field '{key}' must be a single value")
        }
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
