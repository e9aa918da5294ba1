use super::prompts::{self, KEY_JOB_DESCRIPTION, KEY_PROFILE};
use super::{AiServices, TaskError};
use crate::models::Profile;
use crate::prompt::PromptVars;

const CONTEXT: &str = "failed to generate cover letter";

impl AiServices {
    pub async fn generate_cover_letter(
        &self,
        job_description: &str,
        profile: &Profile,
    ) -> Result<String, TaskError> {
        let vars = PromptVars::new()
            .text(KEY_JOB_DESCRIPTION, job_description)
            .json(KEY_PROFILE, profile)
            .map_err(|e| TaskError::new(CONTEXT, e))?;
        self.run_text(CONTEXT, &prompts::cover_letter(), &vars)
            .await
    }
}
