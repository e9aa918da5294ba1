/// LLM Client: the single point of entry for all model calls.
///
/// No other module talks to the provider directly. Task services hold an
/// `Arc<dyn ChatModel>` built once at startup and go through [`invoke`].
///
/// One call = one network round trip. There is no retry loop and no client-side
/// timeout beyond the provider's own; failures surface as [`LlmError`].
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::prompt::{PromptMessage, Role};

pub mod format;
pub mod prompts;

pub use format::OutputFormat;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// Model used when `LLM_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("conversation has no user turn")]
    NoUserTurn,
}

/// A chat-completion backend: ordered role-tagged messages in, raw text out.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, messages: &[PromptMessage]) -> Result<String, LlmError>;

    fn model_name(&self) -> &str;
}

/// Sends `messages` to the model. When `format` is given, schema-derived
/// format instructions are appended to the last human message first. The
/// reply is returned untouched; enforcing the schema is the coercer's job.
pub async fn invoke(
    model: &dyn ChatModel,
    messages: Vec<PromptMessage>,
    format: Option<&OutputFormat>,
) -> Result<String, LlmError> {
    let messages = match format {
        Some(format) => format.append_to(messages),
        None => messages,
    };
    debug!(
        model = model.model_name(),
        messages = messages.len(),
        chars = messages.iter().map(|m| m.content.len()).sum::<usize>(),
        "Invoking model"
    );
    model.complete(&messages).await
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Serialize, PartialEq)]
struct AnthropicMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Anthropic Messages API client. Cheap to clone; the inner `reqwest::Client`
/// pools connections.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl LlmClient {
    pub fn new(api_key: String, model: String, max_tokens: u32) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().build()?,
            api_key,
            model,
            max_tokens,
        })
    }

    /// Makes one call to the Messages API and returns the full response object.
    pub async fn call(&self, messages: &[PromptMessage]) -> Result<LlmResponse, LlmError> {
        let request_body = build_request(&self.model, self.max_tokens, messages)?;

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );

        Ok(llm_response)
    }
}

#[async_trait]
impl ChatModel for LlmClient {
    async fn complete(&self, messages: &[PromptMessage]) -> Result<String, LlmError> {
        let response = self.call(messages).await?;
        match response.text() {
            Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
            _ => Err(LlmError::EmptyContent),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Maps rendered messages onto the Messages API shape: system messages are
/// joined into the top-level `system` field and adjacent turns of the same
/// role are merged, since the API expects user/assistant alternation.
fn build_request<'a>(
    model: &'a str,
    max_tokens: u32,
    messages: &[PromptMessage],
) -> Result<AnthropicRequest<'a>, LlmError> {
    let system: Vec<&str> = messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect();

    let mut turns: Vec<AnthropicMessage> = Vec::new();
    for message in messages.iter().filter(|m| m.role != Role::System) {
        let role = match message.role {
            Role::Assistant => "assistant",
            _ => "user",
        };
        match turns.last_mut() {
            Some(last) if last.role == role => {
                last.content.push_str("\n\n");
                last.content.push_str(&message.content);
            }
            _ => turns.push(AnthropicMessage {
                role,
                content: message.content.clone(),
            }),
        }
    }

    if !turns.iter().any(|t| t.role == "user") {
        return Err(LlmError::NoUserTurn);
    }

    Ok(AnthropicRequest {
        model,
        max_tokens,
        system: (!system.is_empty()).then(|| system.join("\n\n")),
        messages: turns,
    })
}
