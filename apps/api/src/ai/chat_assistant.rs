use serde::Serialize;

use super::prompts::{
    self, KEY_COMPANY, KEY_HISTORY, KEY_JOB_EXCERPT, KEY_JOB_TITLE, KEY_MATCH_SCORE, KEY_MESSAGE,
    KEY_STRENGTHS, KEY_WEAKNESSES,
};
use super::{AiServices, TaskError};
use crate::models::{ChatMessage, ChatRole, Job, JobAnalysis};
use crate::prompt::{PromptMessage, PromptVars};

const CONTEXT: &str = "failed to generate chat reply";

/// Characters of the job description quoted in the chat preamble.
pub const JOB_EXCERPT_CHARS: usize = 500;

/// The slice of a job the chat preamble needs.
#[derive(Debug, Clone, Serialize)]
pub struct JobContext {
    pub title: String,
    pub company: String,
    pub description: String,
}

impl From<&Job> for JobContext {
    fn from(job: &Job) -> Self {
        Self {
            title: job.title.clone(),
            company: job.company.clone(),
            description: job.description.clone(),
        }
    }
}

impl AiServices {
    /// Replies to `new_message` as a career coach for one job. The job and its
    /// analysis are stated once in a system preamble; `history` is replayed
    /// oldest-first as native user/assistant turns.
    pub async fn reply_in_chat(
        &self,
        job: &JobContext,
        analysis: &JobAnalysis,
        history: &[ChatMessage],
        new_message: &str,
    ) -> Result<String, TaskError> {
        let vars = PromptVars::new()
            .text(KEY_JOB_TITLE, job.title.as_str())
            .text(KEY_COMPANY, job.company.as_str())
            .text(KEY_JOB_EXCERPT, excerpt(&job.description, JOB_EXCERPT_CHARS))
            .text(KEY_MATCH_SCORE, analysis.match_score.to_string())
            .text(KEY_STRENGTHS, analysis.strengths.join(", "))
            .text(KEY_WEAKNESSES, analysis.weaknesses.join(", "))
            .messages(KEY_HISTORY, history_turns(history))
            .text(KEY_MESSAGE, new_message);

        self.run_text(CONTEXT, &prompts::chat_reply(), &vars).await
    }
}

fn history_turns(history: &[ChatMessage]) -> Vec<PromptMessage> {
    let mut ordered: Vec<&ChatMessage> = history.iter().collect();
    ordered.sort_by_key(|m| m.timestamp);
    ordered
        .into_iter()
        .map(|m| match m.role {
            ChatRole::User => PromptMessage::human(m.content.as_str()),
            ChatRole::Assistant => PromptMessage::assistant(m.content.as_str()),
        })
        .collect()
}

fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::ai::testing::ScriptedModel;
    use crate::coercion::Coercer;
    use crate::prompt::Role;

    fn message(role: ChatRole, content: &str, minute: i64) -> ChatMessage {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        ChatMessage {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            job_id: Uuid::nil(),
            role,
            content: content.to_string(),
            timestamp: base + Duration::minutes(minute),
        }
    }

    fn analysis() -> JobAnalysis {
        JobAnalysis {
            match_score: 64,
            strengths: vec!["Rust".to_string(), "SQL".to_string()],
            weaknesses: vec!["Kubernetes".to_string()],
            gaps: vec![],
            upskilling_suggestions: vec![],
        }
    }

    #[tokio::test]
    async fn test_history_is_replayed_in_order_after_one_preamble() {
        let model = Arc::new(ScriptedModel::replying("Lead with your Rust work."));
        let ai = AiServices::new(model.clone(), Coercer::strict());
        let job = JobContext {
            title: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            description: "Build APIs".to_string(),
        };
        // Delivered out of order on purpose.
        let history = vec![
            message(ChatRole::Assistant, "Hello", 2),
            message(ChatRole::User, "Hi", 1),
        ];

        let reply = ai
            .reply_in_chat(&job, &analysis(), &history, "What should I emphasise?")
            .await
            .unwrap();
        assert_eq!(reply, "Lead with your Rust work.");

        let sent = &model.calls()[0];
        let roles: Vec<Role> = sent.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::Human, Role::Assistant, Role::Human]
        );
        assert_eq!(sent[1].content, "Hi");
        assert_eq!(sent[2].content, "Hello");
        assert_eq!(sent[3].content, "What should I emphasise?");

        let preamble = &sent[0].content;
        assert!(preamble.contains("Job Title: Backend Engineer"));
        assert!(preamble.contains("Company: Acme"));
        assert!(preamble.contains("Match Score: 64%"));
        assert!(preamble.contains("Key Strengths: Rust, SQL"));
        assert!(preamble.contains("Areas to Improve: Kubernetes"));
        assert_eq!(
            sent.iter()
                .filter(|m| m.content.contains("Job Title:"))
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_first_turn_has_no_history() {
        let model = Arc::new(ScriptedModel::replying("Sure."));
        let ai = AiServices::new(model.clone(), Coercer::strict());
        let job = JobContext {
            title: "T".to_string(),
            company: "C".to_string(),
            description: "D".to_string(),
        };
        ai.reply_in_chat(&job, &analysis(), &[], "Hello?")
            .await
            .unwrap();
        assert_eq!(model.calls()[0].len(), 2);
    }

    #[test]
    fn test_equal_timestamps_keep_stored_order() {
        let history = vec![
            message(ChatRole::User, "first", 1),
            message(ChatRole::Assistant, "second", 1),
        ];
        let turns = history_turns(&history);
        assert_eq!(turns[0].content, "first");
        assert_eq!(turns[1].content, "second");
    }

    #[test]
    fn test_excerpt_cuts_on_char_boundary() {
        assert_eq!(excerpt("short", 500), "short");
        let long = "é".repeat(600);
        let cut = excerpt(&long, 500);
        assert_eq!(cut.chars().count(), 503);
        assert!(cut.ends_with("..."));
    }
}
