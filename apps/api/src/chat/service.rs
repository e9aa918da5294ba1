use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::ai::{AiServices, JobContext};
use crate::errors::AppError;
use crate::jobs::service::require_job;
use crate::models::{ChatMessage, ChatRole, Job};
use crate::store::chat;

/// One chat turn: asks the model, then stores the user's message and the
/// reply together and returns the reply. A failed reply stores nothing.
pub async fn send_message(
    db: &PgPool,
    ai: &AiServices,
    user_id: Uuid,
    job_id: Uuid,
    content: &str,
) -> Result<ChatMessage, AppError> {
    let job = require_job(db, user_id, job_id).await?;

    // Read before writing so the new message is not replayed as history.
    let history = chat::history(db, user_id, job_id).await?;

    let (user_message, assistant_message) = converse(ai, &job, &history, content).await?;
    chat::insert_messages(db, &[&user_message, &assistant_message]).await?;

    info!(
        "Chat turn for job {job_id}: {} prior messages, reply {} chars",
        history.len(),
        assistant_message.content.len()
    );
    Ok(assistant_message)
}

/// Builds the user's message before the model call so it sorts ahead of the
/// reply, then the reply itself. Touches no storage.
async fn converse(
    ai: &AiServices,
    job: &Job,
    history: &[ChatMessage],
    content: &str,
) -> Result<(ChatMessage, ChatMessage), AppError> {
    let user_message = ChatMessage::new(job.user_id, job.id, ChatRole::User, content);

    let reply = ai
        .reply_in_chat(&JobContext::from(job), &job.analysis.0, history, content)
        .await?;

    let assistant_message = ChatMessage::new(job.user_id, job.id, ChatRole::Assistant, reply);
    Ok((user_message, assistant_message))
}

pub async fn history(
    db: &PgPool,
    user_id: Uuid,
    job_id: Uuid,
) -> Result<Vec<ChatMessage>, AppError> {
    require_job(db, user_id, job_id).await?;
    Ok(chat::history(db, user_id, job_id).await?)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use sqlx::types::Json;

    use super::*;
    use crate::ai::testing::{FailingModel, ScriptedModel};
    use crate::coercion::Coercer;
    use crate::models::JobAnalysis;

    fn job() -> Job {
        Job {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            location: None,
            url: None,
            description: "Build and run payment APIs in Rust.".to_string(),
            analysis: Json(JobAnalysis {
                match_score: 70,
                strengths: vec!["Rust".to_string()],
                weaknesses: vec![],
                gaps: vec![],
                upskilling_suggestions: vec![],
            }),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_turn_yields_user_message_then_reply() {
        let ai = AiServices::new(
            Arc::new(ScriptedModel::replying("Mention the payments work.")),
            Coercer::strict(),
        );
        let job = job();

        let (user_message, reply) = converse(&ai, &job, &[], "How do I open?").await.unwrap();

        assert_eq!(user_message.role, ChatRole::User);
        assert_eq!(user_message.content, "How do I open?");
        assert_eq!(reply.role, ChatRole::Assistant);
        assert_eq!(reply.content, "Mention the payments work.");
        assert_eq!((reply.user_id, reply.job_id), (job.user_id, job.id));
        assert!(user_message.timestamp <= reply.timestamp);
    }

    #[tokio::test]
    async fn test_failed_reply_yields_no_messages() {
        let ai = AiServices::new(Arc::new(FailingModel), Coercer::strict());

        let result = converse(&ai, &job(), &[], "How do I open?").await;

        assert!(matches!(result, Err(AppError::Llm(_))));
    }
}
