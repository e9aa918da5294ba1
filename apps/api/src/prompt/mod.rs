#![allow(dead_code)]

//! Prompt Builder: turns a task template plus caller-supplied values into the
//! ordered, role-tagged message list sent to the model.
//!
//! Instruction text and data never share a string before rendering: a template
//! is a list of fixed parts and named placeholders, and rendering is a single
//! pass. Substituted values are not re-scanned, so a job description containing
//! `{profile}` or raw JSON braces cannot alter the instruction around it.

use serde::Serialize;
use thiserror::Error;

pub mod template;

pub use template::{MessageTemplate, PromptTemplate, PromptVars};

/// Speaker of a rendered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    Human,
    Assistant,
}

/// A single rendered message, ready for the Model Invoker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: Role::Human,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template '{template}' has no value for placeholder '{key}'")]
    MissingValue { template: String, key: String },

    #[error("placeholder '{key}' in template '{template}' expects {expected}")]
    WrongKind {
        template: String,
        key: String,
        expected: &'static str,
    },

    #[error("could not serialize value for placeholder '{key}': {reason}")]
    Serialize { key: String, reason: String },
}

/// Joins the content of every message, in order, into one block of text.
/// Used to compare the split and combined renderings of the same template.
pub fn flatten_text(messages: &[PromptMessage]) -> String {
    messages
        .iter()
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join(template::MESSAGE_SEPARATOR)
}
