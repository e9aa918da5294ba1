#![allow(dead_code)]

use std::borrow::Cow;
use std::collections::HashMap;

use serde::Serialize;

use super::{PromptMessage, Role, TemplateError};

/// Separator placed between messages when a split template is flattened.
pub const MESSAGE_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Fixed(Cow<'static, str>),
    Placeholder(Cow<'static, str>),
}

/// One message slot: a role plus an ordered list of fixed text and placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    role: Role,
    parts: Vec<Part>,
}

impl MessageTemplate {
    pub fn system() -> Self {
        Self::with_role(Role::System)
    }

    pub fn human() -> Self {
        Self::with_role(Role::Human)
    }

    fn with_role(role: Role) -> Self {
        Self {
            role,
            parts: Vec::new(),
        }
    }

    /// Appends fixed instruction text. Never scanned for placeholders.
    pub fn text(mut self, text: impl Into<Cow<'static, str>>) -> Self {
        self.parts.push(Part::Fixed(text.into()));
        self
    }

    /// Appends a named placeholder, filled verbatim at render time.
    pub fn var(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.parts.push(Part::Placeholder(key.into()));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Message(MessageTemplate),
    /// Expands into a caller-supplied list of messages (conversation history).
    Messages(Cow<'static, str>),
}

/// A versioned task template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    name: &'static str,
    version: u32,
    slots: Vec<Slot>,
}

impl PromptTemplate {
    pub fn new(name: &'static str, version: u32) -> Self {
        Self {
            name,
            version,
            slots: Vec::new(),
        }
    }

    /// Single-instruction flavour: all context interpolated into one human message.
    pub fn combined(name: &'static str, version: u32, body: MessageTemplate) -> Self {
        Self::new(name, version).message(MessageTemplate {
            role: Role::Human,
            parts: body.parts,
        })
    }

    /// System/human flavour: task framing separated from per-call variables.
    pub fn split(
        name: &'static str,
        version: u32,
        system: MessageTemplate,
        human: MessageTemplate,
    ) -> Self {
        Self::new(name, version).message(system).message(human)
    }

    pub fn message(mut self, message: MessageTemplate) -> Self {
        self.slots.push(Slot::Message(message));
        self
    }

    pub fn messages(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.slots.push(Slot::Messages(key.into()));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Every placeholder key, in template order.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut keys = Vec::new();
        for slot in &self.slots {
            match slot {
                Slot::Message(m) => {
                    for part in &m.parts {
                        if let Part::Placeholder(key) = part {
                            keys.push(key.as_ref());
                        }
                    }
                }
                Slot::Messages(key) => keys.push(key.as_ref()),
            }
        }
        keys
    }

    /// Collapses a split template into the single-message flavour.
    /// Returns `None` when the template carries a message-list slot, which has
    /// no single-message equivalent.
    pub fn to_combined(&self) -> Option<PromptTemplate> {
        let mut parts = Vec::new();
        for (i, slot) in self.slots.iter().enumerate() {
            let Slot::Message(m) = slot else {
                return None;
            };
            if i > 0 {
                parts.push(Part::Fixed(Cow::Borrowed(MESSAGE_SEPARATOR)));
            }
            parts.extend(m.parts.iter().cloned());
        }
        Some(PromptTemplate {
            name: self.name,
            version: self.version,
            slots: vec![Slot::Message(MessageTemplate {
                role: Role::Human,
                parts,
            })],
        })
    }

    /// Renders the template. Fails on the first placeholder without a value;
    /// nothing is ever substituted with an empty string.
    pub fn render(&self, vars: &PromptVars) -> Result<Vec<PromptMessage>, TemplateError> {
        let mut out = Vec::with_capacity(self.slots.len());
        for slot in &self.slots {
            match slot {
                Slot::Message(m) => {
                    let mut content = String::new();
                    for part in &m.parts {
                        match part {
                            Part::Fixed(text) => content.push_str(text),
                            Part::Placeholder(key) => content.push_str(self.text_value(vars, key)?),
                        }
                    }
                    out.push(PromptMessage {
                        role: m.role,
                        content,
                    });
                }
                Slot::Messages(key) => match vars.get(key) {
                    Some(PromptValue::Messages(list)) => out.extend(list.iter().cloned()),
                    Some(PromptValue::Text(_)) => {
                        return Err(self.wrong_kind(key, "a message list"));
                    }
                    None => return Err(self.missing(key)),
                },
            }
        }
        Ok(out)
    }

    fn text_value<'v>(&self, vars: &'v PromptVars, key: &str) -> Result<&'v str, TemplateError> {
        match vars.get(key) {
            Some(PromptValue::Text(text)) => Ok(text),
            Some(PromptValue::Messages(_)) => Err(self.wrong_kind(key, "text")),
            None => Err(self.missing(key)),
        }
    }

    fn missing(&self, key: &str) -> TemplateError {
        TemplateError::MissingValue {
            template: self.name.to_string(),
            key: key.to_string(),
        }
    }

    fn wrong_kind(&self, key: &str, expected: &'static str) -> TemplateError {
        TemplateError::WrongKind {
            template: self.name.to_string(),
            key: key.to_string(),
            expected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptValue {
    Text(String),
    Messages(Vec<PromptMessage>),
}

/// Placeholder name → value.
#[derive(Debug, Clone, Default)]
pub struct PromptVars {
    values: HashMap<String, PromptValue>,
}

impl PromptVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, key: &str, value: impl Into<String>) -> Self {
        self.values
            .insert(key.to_string(), PromptValue::Text(value.into()));
        self
    }

    /// Serializes a structured value as pretty JSON. Field order follows the
    /// struct declaration, so the rendered text is stable across calls.
    pub fn json<T: Serialize>(self, key: &str, value: &T) -> Result<Self, TemplateError> {
        let text = serde_json::to_string_pretty(value).map_err(|e| TemplateError::Serialize {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        Ok(self.text(key, text))
    }

    pub fn messages(mut self, key: &str, messages: Vec<PromptMessage>) -> Self {
        self.values
            .insert(key.to_string(), PromptValue::Messages(messages));
        self
    }

    pub fn get(&self, key: &str) -> Option<&PromptValue> {
        self.values.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::flatten_text;

    fn analysis_like() -> PromptTemplate {
        PromptTemplate::split(
            "analysis",
            1,
            MessageTemplate::system().text("You are a careful analyst."),
            MessageTemplate::human()
                .text("Job:\n")
                .var("job")
                .text("\n\nProfile:\n")
                .var("profile"),
        )
    }

    #[test]
    fn test_render_split_substitutes_in_order() {
        let vars = PromptVars::new()
            .text("job", "Rust engineer")
            .text("profile", "Ten years of systems work");
        let messages = analysis_like().render(&vars).unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], PromptMessage::system("You are a careful analyst."));
        assert_eq!(
            messages[1].content,
            "Job:\nRust engineer\n\nProfile:\nTen years of systems work"
        );
        assert_eq!(messages[1].role, Role::Human);
    }

    #[test]
    fn test_missing_placeholder_names_the_key() {
        let vars = PromptVars::new().text("job", "Rust engineer");
        let err = analysis_like().render(&vars).unwrap_err();
        assert_eq!(
            err,
            TemplateError::MissingValue {
                template: "analysis".to_string(),
                key: "profile".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_value_is_substituted_but_absent_value_is_not() {
        let vars = PromptVars::new().text("job", "").text("profile", "p");
        assert!(analysis_like().render(&vars).is_ok());
    }

    #[test]
    fn test_values_are_not_rescanned_for_placeholders() {
        let vars = PromptVars::new()
            .text("job", "Build {profile} parsers with {\"json\": true}")
            .text("profile", "SECRET");
        let messages = analysis_like().render(&vars).unwrap();
        assert!(messages[1]
            .content
            .contains("Build {profile} parsers with {\"json\": true}"));
        assert_eq!(messages[1].content.matches("SECRET").count(), 1);
    }

    #[test]
    fn test_fixed_text_with_braces_is_left_alone() {
        let template = PromptTemplate::combined(
            "schema",
            1,
            MessageTemplate::human()
                .text("Return {\"matchScore\": number} for ")
                .var("job"),
        );
        let vars = PromptVars::new().text("job", "X");
        let messages = template.render(&vars).unwrap();
        assert_eq!(messages[0].content, "Return {\"matchScore\": number} for X");
    }

    #[test]
    fn test_split_and_combined_render_equivalent_text() {
        let split = analysis_like();
        let combined = split.to_combined().unwrap();
        let vars = PromptVars::new().text("job", "J").text("profile", "P");

        let split_messages = split.render(&vars).unwrap();
        let combined_messages = combined.render(&vars).unwrap();

        assert_eq!(combined_messages.len(), 1);
        assert_eq!(combined_messages[0].role, Role::Human);
        assert_eq!(flatten_text(&split_messages), combined_messages[0].content);
    }

    #[test]
    fn test_message_list_slot_expands_in_place() {
        let template = PromptTemplate::new("chat", 1)
            .message(MessageTemplate::system().text("preamble"))
            .messages("history")
            .message(MessageTemplate::human().var("message"));
        let vars = PromptVars::new()
            .messages(
                "history",
                vec![PromptMessage::human("Hi"), PromptMessage::assistant("Hello")],
            )
            .text("message", "Next?");

        let messages = template.render(&vars).unwrap();
        let contents: Vec<_> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["preamble", "Hi", "Hello", "Next?"]);
        assert!(template.to_combined().is_none());
    }

    #[test]
    fn test_wrong_value_kind_is_rejected() {
        let template = PromptTemplate::new("chat", 1).messages("history");
        let vars = PromptVars::new().text("history", "not a list");
        assert!(matches!(
            template.render(&vars),
            Err(TemplateError::WrongKind { .. })
        ));
    }

    #[test]
    fn test_placeholders_listed_in_order() {
        assert_eq!(analysis_like().placeholders(), vec!["job", "profile"]);
    }

    #[test]
    fn test_json_value_uses_declared_field_order() {
        #[derive(Serialize)]
        struct Sample {
            zeta: u8,
            alpha: u8,
        }
        let vars = PromptVars::new()
            .json("sample", &Sample { zeta: 1, alpha: 2 })
            .unwrap();
        let Some(PromptValue::Text(text)) = vars.get("sample") else {
            panic!("expected text value");
        };
        assert!(text.find("zeta").unwrap() < text.find("alpha").unwrap());
    }
}
