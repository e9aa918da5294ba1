//! Schema walk: checks a parsed JSON value against the statically declared
//! schema of the target type before typed deserialization.
//!
//! The schema comes from `schemars`, so the Rust type is the single source of
//! truth for required fields, nesting and which strings are dates.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::dates::parse_date_like;
use super::CoercionError;

/// A record a structured task can coerce model output into.
pub trait OutputSchema: DeserializeOwned + JsonSchema {
    /// Range and invariant checks that the schema alone cannot express.
    fn validate(&self) -> Result<(), CoercionError> {
        Ok(())
    }
}

/// Runs the schema walk, deserializes into `T`, then validates.
pub fn conform<T: OutputSchema>(mut value: Value) -> Result<T, CoercionError> {
    let root = schemars::schema_for!(T).to_value();
    walk(&mut value, &root, &root, "")?;

    let record: T = serde_json::from_value(value)
        .map_err(|e| CoercionError::schema(ROOT_PATH, e.to_string()))?;
    record.validate()?;
    Ok(record)
}

const ROOT_PATH: &str = "$";
const MAX_REF_DEPTH: usize = 16;

fn walk(value: &mut Value, schema: &Value, root: &Value, path: &str) -> Result<(), CoercionError> {
    let schema = resolve(schema, root);
    if value.is_null() {
        return Ok(());
    }

    for key in ["anyOf", "oneOf"] {
        if let Some(variants) = schema.get(key).and_then(Value::as_array) {
            if let Some(variant) = variants
                .iter()
                .map(|v| resolve(v, root))
                .find(|v| !is_null_schema(v))
            {
                return walk(value, variant, root, path);
            }
        }
    }

    if schema.get("format").and_then(Value::as_str) == Some("date") {
        let date = match value.as_str() {
            Some(raw) => parse_date_like(raw).ok_or_else(|| CoercionError::DateParse {
                field: display_path(path),
                value: raw.to_string(),
            })?,
            None => {
                return Err(CoercionError::schema(
                    display_path(path),
                    "expected an ISO-8601 date string",
                ))
            }
        };
        *value = Value::String(date.format("%Y-%m-%d").to_string());
        return Ok(());
    }

    match value {
        Value::Object(map) => {
            let properties = schema.get("properties").and_then(Value::as_object);
            let required: Vec<&str> = schema
                .get("required")
                .and_then(Value::as_array)
                .map(|names| names.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();

            // A null the schema does not allow counts as absent: an error for
            // required fields, the serde default for optional ones.
            if let Some(properties) = properties {
                for (name, property) in properties {
                    if map.get(name).is_some_and(Value::is_null) && !allows_null(property, root) {
                        if required.contains(&name.as_str()) {
                            return Err(CoercionError::schema(
                                join(path, name),
                                "required field is missing",
                            ));
                        }
                        map.remove(name);
                    }
                }
            }

            for name in required {
                if !map.contains_key(name) {
                    return Err(CoercionError::schema(
                        join(path, name),
                        "required field is missing",
                    ));
                }
            }

            if let Some(properties) = properties {
                for (name, property) in properties {
                    if let Some(child) = map.get_mut(name) {
                        walk(child, property, root, &join(path, name))?;
                    }
                }
            }
        }
        Value::Array(items) => {
            if let Some(item_schema) = schema.get("items") {
                for (i, item) in items.iter_mut().enumerate() {
                    walk(item, item_schema, root, &format!("{path}[{i}]"))?;
                }
            }
        }
        _ => {}
    }

    Ok(())
}

/// Follows local `$ref`s (`#/$defs/...` or `#/definitions/...`).
fn resolve<'a>(mut schema: &'a Value, root: &'a Value) -> &'a Value {
    for _ in 0..MAX_REF_DEPTH {
        let Some(target) = schema
            .get("$ref")
            .and_then(Value::as_str)
            .and_then(|r| r.strip_prefix('#'))
            .and_then(|pointer| root.pointer(pointer))
        else {
            break;
        };
        schema = target;
    }
    schema
}

fn is_null_schema(schema: &Value) -> bool {
    schema.get("type").and_then(Value::as_str) == Some("null")
}

/// True when `null` is a valid instance of `schema`: a null type, a type list
/// containing `"null"`, or a null branch in `anyOf`/`oneOf`.
fn allows_null(schema: &Value, root: &Value) -> bool {
    let schema = resolve(schema, root);
    match schema.get("type") {
        Some(Value::String(t)) if t == "null" => return true,
        Some(Value::Array(types)) if types.iter().any(|t| t == "null") => return true,
        _ => {}
    }
    ["anyOf", "oneOf"].iter().any(|key| {
        schema
            .get(*key)
            .and_then(Value::as_array)
            .is_some_and(|variants| variants.iter().any(|v| allows_null(v, root)))
    })
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        ROOT_PATH.to_string()
    } else {
        path.to_string()
    }
}
