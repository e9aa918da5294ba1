use super::prompts::{self, KEY_JOB_DESCRIPTION, KEY_PROFILE};
use super::{AiServices, TaskError};
use crate::models::Profile;
use crate::prompt::PromptVars;

const CONTEXT: &str = "failed to generate tailored resume";

impl AiServices {
    /// Writes a Markdown resume for `profile` tailored to the job.
    pub async fn generate_tailored_resume(
        &self,
        job_description: &str,
        profile: &Profile,
    ) -> Result<String, TaskError> {
        let vars = PromptVars::new()
            .text(KEY_JOB_DESCRIPTION, job_description)
            .json(KEY_PROFILE, profile)
            .map_err(|e| TaskError::new(CONTEXT, e))?;
        self.run_text(CONTEXT, &prompts::tailored_resume(), &vars)
            .await
    }
}
