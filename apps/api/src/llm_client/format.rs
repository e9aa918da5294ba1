#![allow(dead_code)]

//! Structured-output mode: machine-readable format instructions derived from
//! the target type's JSON Schema.

use schemars::JsonSchema;
use serde_json::Value;

use crate::prompt::{PromptMessage, Role};

/// The JSON Schema of a task's target record, rendered into instructions for
/// the model. Describes the expected shape only; it does not enforce it.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    schema: Value,
}

impl OutputFormat {
    pub fn of<T: JsonSchema>() -> Self {
        Self {
            schema: schemars::schema_for!(T).to_value(),
        }
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    pub fn instructions(&self) -> String {
        let schema =
            serde_json::to_string_pretty(&self.schema).unwrap_or_else(|_| self.schema.to_string());
        format!(
            "OUTPUT FORMAT:\n\
             Respond with a single JSON object that conforms to the JSON Schema below.\n\
             - Include every property listed under \"required\".\n\
             - Dates must be ISO-8601 strings (YYYY-MM-DD).\n\
             - Do NOT add commentary, markdown fences, or trailing commas.\n\
             \n\
             JSON Schema:\n{schema}"
        )
    }

    /// Appends the instructions to the last human message, or adds a human
    /// message carrying them when there is none.
    pub fn append_to(&self, mut messages: Vec<PromptMessage>) -> Vec<PromptMessage> {
        let instructions = self.instructions();
        match messages.iter_mut().rev().find(|m| m.role == Role::Human) {
            Some(last_human) => {
                last_human.content.push_str("\n\n");
                last_human.content.push_str(&instructions);
            }
            None => messages.push(PromptMessage::human(instructions)),
        }
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, JsonSchema)]
    #[serde(rename_all = "camelCase")]
    #[allow(dead_code)]
    struct Sample {
        match_score: i32,
        notes: Option<String>,
    }

    #[test]
    fn test_schema_lists_required_fields_with_wire_names() {
        let format = OutputFormat::of::<Sample>();
        let required = format.schema()["required"].as_array().unwrap();
        assert!(required.iter().any(|v| v == "matchScore"));
        assert!(!required.iter().any(|v| v == "notes"));
    }

    #[test]
    fn test_instructions_appended_to_last_human_message() {
        let format = OutputFormat::of::<Sample>();
        let messages = vec![
            PromptMessage::system("framing"),
            PromptMessage::human("first"),
            PromptMessage::assistant("reply"),
            PromptMessage::human("second"),
        ];
        let out = format.append_to(messages);

        assert_eq!(out.len(), 4);
        assert_eq!(out[0].content, "framing");
        assert_eq!(out[1].content, "first");
        assert!(out[3].content.starts_with("second\n\nOUTPUT FORMAT:"));
        assert!(out[3].content.contains("matchScore"));
    }

    #[test]
    fn test_instructions_added_when_no_human_message() {
        let format = OutputFormat::of::<Sample>();
        let out = format.append_to(vec![PromptMessage::system("framing")]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].role, Role::Human);
    }
}
