#![allow(dead_code)]

//! Response Coercer: the one place where untrusted model text becomes a typed
//! value.
//!
//! The model is instructed, not guaranteed, to emit pure JSON. Extraction is a
//! greedy first-`{` / last-`}` slice so prose around the object is tolerated,
//! then a strict parse, then a schema walk (required fields, date fields), then
//! typed deserialization and range checks. Any failure aborts the coercion; no
//! partially-populated record is ever returned.

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

pub mod dates;
pub mod repair;
pub mod schema;

pub use schema::OutputSchema;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoercionError {
    #[error("no JSON object found in model response")]
    NoJsonFound,

    #[error("malformed JSON in model response ({reason}): {}", preview(.snippet))]
    MalformedJson { snippet: String, reason: String },

    #[error("response does not match schema at '{field}': {reason}")]
    SchemaValidation { field: String, reason: String },

    #[error("field '{field}' has unparseable date '{value}'")]
    DateParse { field: String, value: String },
}

impl CoercionError {
    pub fn schema(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CoercionError::SchemaValidation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

fn preview(snippet: &str) -> String {
    const MAX: usize = 120;
    if snippet.chars().count() <= MAX {
        snippet.to_string()
    } else {
        format!("{}…", snippet.chars().take(MAX).collect::<String>())
    }
}

/// A coerced value plus whether bracket repair was needed to obtain it.
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced<T> {
    pub value: T,
    pub repaired: bool,
}

/// Coercion settings. Repair is off unless `LLM_JSON_REPAIR` enables it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Coercer {
    repair: bool,
}

impl Coercer {
    pub fn strict() -> Self {
        Self { repair: false }
    }

    pub fn with_repair(repair: bool) -> Self {
        Self { repair }
    }

    /// Extracts and parses the JSON object embedded in `raw`.
    pub fn extract(&self, raw: &str) -> Result<Coerced<Value>, CoercionError> {
        let slice = json_slice(raw)?;
        match serde_json::from_str::<Value>(slice) {
            Ok(value) => Ok(Coerced {
                value,
                repaired: false,
            }),
            Err(e) => {
                let malformed = CoercionError::MalformedJson {
                    snippet: slice.to_string(),
                    reason: e.to_string(),
                };
                if !self.repair {
                    return Err(malformed);
                }
                let Some(fixed) = repair::balance_brackets(slice) else {
                    return Err(malformed);
                };
                match serde_json::from_str::<Value>(&fixed) {
                    Ok(value) => {
                        warn!(
                            "Repaired malformed JSON from model ({} -> {} bytes): {e}",
                            slice.len(),
                            fixed.len()
                        );
                        Ok(Coerced {
                            value,
                            repaired: true,
                        })
                    }
                    Err(_) => Err(malformed),
                }
            }
        }
    }

    /// Extracts the embedded JSON and converts it into `T`.
    pub fn coerce<T: OutputSchema>(&self, raw: &str) -> Result<Coerced<T>, CoercionError> {
        let Coerced { value, repaired } = self.extract(raw)?;
        let value = schema::conform::<T>(value)?;
        Ok(Coerced { value, repaired })
    }
}

/// Schema-free extraction with repair disabled.
pub fn extract_json(raw: &str) -> Result<Value, CoercionError> {
    Coercer::strict().extract(raw).map(|c| c.value)
}

/// Typed coercion with repair disabled.
pub fn coerce<T: OutputSchema>(raw: &str) -> Result<T, CoercionError> {
    Coercer::strict().coerce::<T>(raw).map(|c| c.value)
}

/// Inclusive slice from the first `{` to the last `}`.
fn json_slice(raw: &str) -> Result<&str, CoercionError> {
    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(&raw[start..=end]),
        _ => Err(CoercionError::NoJsonFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_json_surrounded_by_prose() {
        let raw = "Here you go:\n{\"matchScore\": 72, \"strengths\": [\"X\"], \"weaknesses\": [], \"gaps\": [\"Y\"], \"upskillingSuggestions\": []}\nHope this helps!";
        let value = extract_json(raw).unwrap();
        assert_eq!(
            value,
            json!({
                "matchScore": 72,
                "strengths": ["X"],
                "weaknesses": [],
                "gaps": ["Y"],
                "upskillingSuggestions": []
            })
        );
    }

    #[test]
    fn test_extraction_equals_direct_parse_for_varied_wrappers() {
        let objects = [
            r#"{"a": 1}"#,
            r#"{"nested": {"list": [1, {"b": "}"}]}, "s": "{not a brace}"}"#,
            r#"{"unicode": "héllo — ✓", "n": null, "t": true}"#,
        ];
        let wrappers = [
            ("", ""),
            ("Sure! ", " Let me know."),
            ("```json\n", "\n```"),
            ("prefix without braces\n\n", "\n\nsuffix without braces"),
        ];
        for object in objects {
            let expected: Value = serde_json::from_str(object).unwrap();
            for (before, after) in wrappers {
                let raw = format!("{before}{object}{after}");
                assert_eq!(extract_json(&raw).unwrap(), expected, "input: {raw}");
            }
        }
    }

    #[test]
    fn test_no_braces_is_no_json_found() {
        assert_eq!(
            extract_json("I could not find a resume in that text."),
            Err(CoercionError::NoJsonFound)
        );
    }

    #[test]
    fn test_braces_in_wrong_order_is_no_json_found() {
        assert_eq!(extract_json("} oops {"), Err(CoercionError::NoJsonFound));
        assert_eq!(extract_json("only open {"), Err(CoercionError::NoJsonFound));
        assert_eq!(extract_json("only close }"), Err(CoercionError::NoJsonFound));
    }

    #[test]
    fn test_malformed_json_carries_offending_slice() {
        let inputs = [
            "Result: {\"a\": 1,} done",
            "{\"a\": [1, 2}",
            "{'single': 'quotes'}",
            "{\"a\": 1} and then {\"b\": 2}",
            "{\"unterminated: 1}",
        ];
        for raw in inputs {
            match extract_json(raw) {
                Err(CoercionError::MalformedJson { snippet, .. }) => {
                    assert!(snippet.starts_with('{') && snippet.ends_with('}'), "{snippet}");
                }
                other => panic!("expected MalformedJson for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_repair_is_opt_in_and_reported() {
        let raw = "Output: {\"strengths\": [\"Rust\", \"SQL\",}";
        assert!(matches!(
            Coercer::strict().extract(raw),
            Err(CoercionError::MalformedJson { .. })
        ));

        let repaired = Coercer::with_repair(true).extract(raw).unwrap();
        assert!(repaired.repaired);
        assert_eq!(repaired.value, json!({"strengths": ["Rust", "SQL"]}));
    }

    #[test]
    fn test_repair_does_not_flag_valid_input() {
        let coerced = Coercer::with_repair(true).extract("{\"a\": 1}").unwrap();
        assert!(!coerced.repaired);
    }

    #[test]
    fn test_unrepairable_input_keeps_original_error() {
        let raw = "{'single': 'quotes'}";
        match Coercer::with_repair(true).extract(raw) {
            Err(CoercionError::MalformedJson { snippet, .. }) => assert_eq!(snippet, raw),
            other => panic!("expected MalformedJson, got {other:?}"),
        }
    }

    #[test]
    fn test_long_snippet_is_truncated_in_display_only() {
        let snippet = format!("{{{}", "x".repeat(500));
        let err = CoercionError::MalformedJson {
            snippet: snippet.clone(),
            reason: "eof".to_string(),
        };
        assert!(err.to_string().len() < 300);
        let CoercionError::MalformedJson { snippet: kept, .. } = err else {
            unreachable!()
        };
        assert_eq!(kept, snippet);
    }
}
