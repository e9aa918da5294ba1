use super::prompts::{self, KEY_RESUME_TEXT};
use super::{AiServices, TaskError};
use crate::models::ParsedProfile;
use crate::prompt::PromptVars;

const CONTEXT: &str = "failed to parse resume";

impl AiServices {
    /// Extracts a partial profile from free-form resume text. Dates come back
    /// as real dates; a date the model wrote in any other shape fails the parse.
    pub async fn parse_resume(&self, resume_text: &str) -> Result<ParsedProfile, TaskError> {
        let vars = PromptVars::new().text(KEY_RESUME_TEXT, resume_text);
        self.run_structured(CONTEXT, &prompts::resume_parse(), &vars)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;
    use crate::ai::testing::ScriptedModel;
    use crate::ai::TaskErrorKind;
    use crate::coercion::{Coercer, CoercionError};

    #[tokio::test]
    async fn test_reply_without_json_is_no_json_found() {
        let ai = AiServices::new(
            Arc::new(ScriptedModel::replying(
                "I'm sorry, I couldn't find a resume in that text.",
            )),
            Coercer::strict(),
        );
        let err = ai.parse_resume("lorem ipsum").await.unwrap_err();
        assert_eq!(err.context, CONTEXT);
        assert!(matches!(
            err.kind,
            TaskErrorKind::Coercion(CoercionError::NoJsonFound)
        ));
    }

    #[tokio::test]
    async fn test_parsed_dates_are_real_dates() {
        let reply = r#"{"experience": [{"title": "Engineer", "company": "Acme", "startDate": "2020-03-01T00:00:00.000Z", "current": true, "description": "Built things"}]}"#;
        let model = Arc::new(ScriptedModel::replying(reply));
        let ai = AiServices::new(model.clone(), Coercer::strict());

        let parsed = ai.parse_resume("Engineer at Acme since March 2020").await.unwrap();
        let experience = parsed.experience.unwrap();
        assert_eq!(
            experience[0].start_date,
            NaiveDate::from_ymd_opt(2020, 3, 1).unwrap()
        );
        assert!(parsed.skills.is_none());
        assert!(model.calls()[0][1]
            .content
            .contains("Engineer at Acme since March 2020"));
    }

    #[tokio::test]
    async fn test_truncated_reply_is_repaired_only_when_enabled() {
        let reply = r#"Sure: {"skills": [{"name": "Rust", "rating": 5},}"#;
        let strict = AiServices::new(Arc::new(ScriptedModel::replying(reply)), Coercer::strict());
        assert!(matches!(
            strict.parse_resume("x").await.unwrap_err().kind,
            TaskErrorKind::Coercion(CoercionError::MalformedJson { .. })
        ));

        let lenient = AiServices::new(
            Arc::new(ScriptedModel::replying(reply)),
            Coercer::with_repair(true),
        );
        let parsed = lenient.parse_resume("x").await.unwrap();
        assert_eq!(parsed.skills.unwrap()[0].name, "Rust");
    }
}
