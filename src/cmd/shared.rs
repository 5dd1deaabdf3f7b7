/*!
shared.rs - helpers shared by the `list` / `exec` subcommands.

Focus:
  - parse_params / load_param_file_into_map: collect raw KEY=VALUE strings
  - build_arguments_from_schema + primitive coercion (schema-driven)
  - param_summary: compact "name:type" listing for human output
*/

use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};

/* ---- Raw Parameter Collection ---- */

/// Parse repeated `--param KEY=VALUE` flags (later duplicates win).
pub fn parse_params(raw: &[String]) -> Result<HashMap<String, String>> {
    let mut provided = HashMap::new();
    for kv in raw {
        let Some((k, v)) = kv.split_once('=') else {
            bail!("invalid --param (expected KEY=VALUE): {kv}");
        };
        let key = k.trim();
        if key.is_empty() {
            bail!("invalid --param (empty key): {kv}");
        }
        provided.insert(key.to_string(), v.trim().to_string());
    }
    Ok(provided)
}

/// Merge a JSON or YAML object file into `provided`. Existing keys (from
/// `--param`) take precedence over file entries.
pub fn load_param_file_into_map(path: &str, provided: &mut HashMap<String, String>) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read param file: {path}"))?;
    let lower = path.to_ascii_lowercase();

    let value: Value = if lower.ends_with(".yaml") || lower.ends_with(".yml") {
        let yaml_v: serde_yaml::Value =
            serde_yaml::from_str(&raw).context("failed to parse YAML param file")?;
        serde_json::to_value(yaml_v).context("failed to convert YAML to JSON")?
    } else {
        serde_json::from_str(&raw).context("failed to parse JSON param file")?
    };

    let obj = value
        .as_object()
        .ok_or_else(|| anyhow::anyhow!("param file root must be an object"))?;

    for (k, v) in obj {
        if provided.contains_key(k) {
            continue;
        }
        let s = match v {
            Value::String(sv) => sv.clone(),
            _ => v.to_string(),
        };
        provided.insert(k.clone(), s);
    }
    Ok(())
}

/* ---- Argument Building / Schema Handling ---- */

/// Declared type of a schema property. Nullable unions such as
/// `["integer", "null"]` resolve to their first non-null member.
fn property_type(prop: &Value) -> &str {
    match prop.get("type") {
        Some(Value::String(s)) => s.as_str(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .find(|s| *s != "null")
            .unwrap_or("string"),
        _ => "string",
    }
}

/// Build a JSON arguments object from raw strings using a tool's input schema.
///
/// - Each known property is coerced by its declared `"type"`.
/// - Missing required properties are an error.
/// - Unknown keys are rejected; the tools deserialize strictly by name and a
///   typo would otherwise be silently replaced by a default.
pub fn build_arguments_from_schema(
    schema: &Map<String, Value>,
    provided: &HashMap<String, String>,
) -> Result<Map<String, Value>> {
    let required: HashSet<&str> = schema
        .get("required")
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter_map(|x| x.as_str()).collect())
        .unwrap_or_default();

    let props = schema
        .get("properties")
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default();

    let mut result = Map::new();
    let mut remaining = provided.clone();

    for (pname, pobj) in &props {
        if let Some(raw_v) = remaining.remove(pname) {
            result.insert(pname.clone(), coerce_value(&raw_v, property_type(pobj)));
        } else if required.contains(pname.as_str()) {
            bail!("missing required parameter: {pname}");
        }
    }

    if !remaining.is_empty() {
        let mut unknown: Vec<&str> = remaining.keys().map(String::as_str).collect();
        unknown.sort();
        bail!("unknown parameter(s): {}", unknown.join(", "));
    }

    Ok(result)
}

/// Coerce a raw string using the schema's type hint. Only the types the tool
/// schemas advertise (integer, boolean, string) are converted; anything else
/// stays a string.
pub fn coerce_value(raw: &str, type_hint: &str) -> Value {
    match type_hint {
        "integer" => raw
            .parse::<i64>()
            .map(|n| Value::Number(n.into()))
            .unwrap_or_else(|_| Value::String(raw.to_string())),
        "boolean" => {
            let l = raw.to_ascii_lowercase();
            match l.as_str() {
                "true" | "1" | "yes" | "y" => Value::Bool(true),
                "false" | "0" | "no" | "n" => Value::Bool(false),
                _ => Value::String(raw.to_string()),
            }
        }
        _ => Value::String(raw.to_string()),
    }
}

/* ---- Display Helpers ---- */

/// "p1:type, p2:type" for a tool schema, or "-" when it takes no parameters.
pub fn param_summary(schema: &Map<String, Value>) -> String {
    let Some(props) = schema.get("properties").and_then(|v| v.as_object()) else {
        return "-".to_string();
    };
    if props.is_empty() {
        return "-".to_string();
    }
    props
        .iter()
        .map(|(name, p)| format!("{name}:{}", property_type(p)))
        .collect::<Vec<_>>()
        .join(", ")
}
