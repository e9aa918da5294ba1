//! Task Services: one operation per user-facing AI task.
//!
//! Each task renders its template, invokes the model once, and (for structured
//! tasks) coerces the reply into a typed record. Failures carry the task
//! context plus the underlying template, invocation, or coercion error.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::coercion::{Coercer, CoercionError, OutputSchema};
use crate::llm_client::{self, ChatModel, LlmError, OutputFormat};
use crate::prompt::{PromptTemplate, PromptVars, TemplateError};

pub mod chat_assistant;
pub mod cover_letter;
pub mod job_analyzer;
pub mod prompts;
pub mod resume_generator;
pub mod resume_parser;

pub use chat_assistant::JobContext;

#[derive(Debug, Error)]
pub enum TaskErrorKind {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("model invocation failed: {0}")]
    ModelInvocation(#[from] LlmError),

    #[error(transparent)]
    Coercion(#[from] CoercionError),
}

#[derive(Debug, Error)]
#[error("{context}: {kind}")]
pub struct TaskError {
    pub context: &'static str,
    #[source]
    pub kind: TaskErrorKind,
}

impl TaskError {
    fn new(context: &'static str, kind: impl Into<TaskErrorKind>) -> Self {
        Self {
            context,
            kind: kind.into(),
        }
    }
}

/// Shared entry point for every AI task. Cheap to clone.
#[derive(Clone)]
pub struct AiServices {
    model: Arc<dyn ChatModel>,
    coercer: Coercer,
}

impl AiServices {
    pub fn new(model: Arc<dyn ChatModel>, coercer: Coercer) -> Self {
        Self { model, coercer }
    }

    /// Render → invoke with format instructions → coerce into `T`.
    async fn run_structured<T: OutputSchema>(
        &self,
        context: &'static str,
        template: &PromptTemplate,
        vars: &PromptVars,
    ) -> Result<T, TaskError> {
        let messages = template
            .render(vars)
            .map_err(|e| TaskError::new(context, e))?;
        let format = OutputFormat::of::<T>();

        info!(
            task = template.name(),
            version = template.version(),
            "Running structured task"
        );
        let raw = llm_client::invoke(self.model.as_ref(), messages, Some(&format))
            .await
            .map_err(|e| TaskError::new(context, e))?;

        let coerced = self
            .coercer
            .coerce::<T>(&raw)
            .map_err(|e| TaskError::new(context, e))?;
        if coerced.repaired {
            warn!(task = template.name(), "Model output needed JSON repair");
        }
        Ok(coerced.value)
    }

    /// Render → invoke → raw text.
    async fn run_text(
        &self,
        context: &'static str,
        template: &PromptTemplate,
        vars: &PromptVars,
    ) -> Result<String, TaskError> {
        let messages = template
            .render(vars)
            .map_err(|e| TaskError::new(context, e))?;

        info!(
            task = template.name(),
            version = template.version(),
            "Running text task"
        );
        let text = llm_client::invoke(self.model.as_ref(), messages, None)
            .await
            .map_err(|e| TaskError::new(context, e))?;
        if text.trim().is_empty() {
            return Err(TaskError::new(context, LlmError::EmptyContent));
        }
        Ok(text)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedModel;
    use super::*;
    use crate::prompt::MessageTemplate;

    #[tokio::test]
    async fn test_missing_placeholder_makes_no_provider_call() {
        let model = Arc::new(ScriptedModel::replying("{}"));
        let ai = AiServices::new(model.clone(), Coercer::strict());
        let template = PromptTemplate::combined(
            "summary",
            1,
            MessageTemplate::human().text("Describe ").var("subject"),
        );

        let err = ai
            .run_text("failed to summarise", &template, &PromptVars::new())
            .await
            .unwrap_err();

        assert_eq!(err.context, "failed to summarise");
        assert!(matches!(
            err.kind,
            TaskErrorKind::Template(TemplateError::MissingValue { ref key, .. }) if key == "subject"
        ));
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn test_whitespace_reply_is_empty_content() {
        let model = Arc::new(ScriptedModel::replying("  \n"));
        let ai = AiServices::new(model, Coercer::strict());
        let template = PromptTemplate::combined("summary", 1, MessageTemplate::human().text("Hi"));

        let err = ai
            .run_text("failed to summarise", &template, &PromptVars::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err.kind,
            TaskErrorKind::ModelInvocation(LlmError::EmptyContent)
        ));
    }

    #[test]
    fn test_task_error_display_carries_context() {
        let err = TaskError::new("failed to parse resume", CoercionError::NoJsonFound);
        assert_eq!(
            err.to_string(),
            "failed to parse resume: no JSON object found in model response"
        );
    }
}
