use super::prompts::{self, KEY_JOB_DESCRIPTION, KEY_PROFILE};
use super::{AiServices, TaskError};
use crate::models::{JobAnalysis, Profile};
use crate::prompt::PromptVars;

const CONTEXT: &str = "failed to analyze job match";

impl AiServices {
    /// Scores `profile` against `job_description`.
    pub async fn analyze_job_match(
        &self,
        job_description: &str,
        profile: &Profile,
    ) -> Result<JobAnalysis, TaskError> {
        let vars = PromptVars::new()
            .text(KEY_JOB_DESCRIPTION, job_description)
            .json(KEY_PROFILE, profile)
            .map_err(|e| TaskError::new(CONTEXT, e))?;
        self.run_structured(CONTEXT, &prompts::job_analysis(), &vars)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::ai::testing::{FailingModel, ScriptedModel};
    use crate::ai::TaskErrorKind;
    use crate::coercion::{Coercer, CoercionError};
    use crate::llm_client::LlmError;
    use crate::prompt::Role;

    const CHATTY_ANALYSIS: &str = "Here you go:\n{\"matchScore\": 72, \"strengths\": [\"X\"], \"weaknesses\": [], \"gaps\": [\"Y\"], \"upskillingSuggestions\": []}\nHope this helps!";

    #[tokio::test]
    async fn test_analysis_from_chatty_reply() {
        let model = Arc::new(ScriptedModel::replying(CHATTY_ANALYSIS));
        let ai = AiServices::new(model.clone(), Coercer::strict());

        let analysis = ai
            .analyze_job_match("Rust engineer, {remote}", &Profile::default())
            .await
            .unwrap();

        assert_eq!(analysis.match_score, 72);
        assert_eq!(analysis.strengths, vec!["X".to_string()]);
        assert_eq!(analysis.gaps, vec!["Y".to_string()]);

        let calls = model.calls();
        assert_eq!(calls.len(), 1);
        let sent = &calls[0];
        assert_eq!(sent[0].role, Role::System);
        assert_eq!(sent[1].role, Role::Human);
        assert!(sent[1].content.contains("Rust engineer, {remote}"));
        assert!(sent[1].content.contains("\"personalInfo\""));
        assert!(sent[1].content.contains("OUTPUT FORMAT:"));
    }

    #[tokio::test]
    async fn test_out_of_range_score_fails_the_task() {
        let reply = CHATTY_ANALYSIS.replace("72", "140");
        let ai = AiServices::new(Arc::new(ScriptedModel::replying(reply)), Coercer::strict());

        let err = ai
            .analyze_job_match("anything", &Profile::default())
            .await
            .unwrap_err();
        assert_eq!(err.context, CONTEXT);
        assert!(matches!(
            err.kind,
            TaskErrorKind::Coercion(CoercionError::SchemaValidation { .. })
        ));
    }

    #[tokio::test]
    async fn test_provider_failure_is_model_invocation() {
        let ai = AiServices::new(Arc::new(FailingModel), Coercer::strict());
        let err = ai
            .analyze_job_match("anything", &Profile::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err.kind,
            TaskErrorKind::ModelInvocation(LlmError::Api { status: 529, .. })
        ));
    }
}
