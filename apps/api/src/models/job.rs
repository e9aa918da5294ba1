use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::coercion::{CoercionError, OutputSchema};

pub const MAX_MATCH_SCORE: i32 = 100;

/// AI match analysis of a profile against a job description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobAnalysis {
    /// Overall compatibility, 0-100.
    pub match_score: i32,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub gaps: Vec<String>,
    pub upskilling_suggestions: Vec<String>,
}

impl OutputSchema for JobAnalysis {
    fn validate(&self) -> Result<(), CoercionError> {
        if !(0..=MAX_MATCH_SCORE).contains(&self.match_score) {
            return Err(CoercionError::schema(
                "matchScore",
                format!(
                    "score {} is outside 0-{MAX_MATCH_SCORE}",
                    self.match_score
                ),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub url: Option<String>,
    pub description: String,
    pub analysis: Json<JobAnalysis>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Draft,
    Applied,
    Interviewing,
    Rejected,
    Offered,
    Accepted,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "draft",
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Interviewing => "interviewing",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Offered => "offered",
            ApplicationStatus::Accepted => "accepted",
        }
    }
}

/// Generated documents for one (user, job) pair.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub tailored_resume: Option<String>,
    pub cover_letter: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
