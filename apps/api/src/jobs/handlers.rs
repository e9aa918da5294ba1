use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::service::{self, JobPosting};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::{Job, JobApplication};
use crate::state::AppState;

/// Shortest job description worth analysing, in characters.
pub const MIN_DESCRIPTION_CHARS: usize = 10;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeJobRequest {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub url: Option<String>,
    pub description: String,
}

impl AnalyzeJobRequest {
    fn into_posting(self) -> Result<JobPosting, AppError> {
        for (name, value) in [
            ("title", &self.title),
            ("company", &self.company),
            ("description", &self.description),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{name} must not be empty")));
            }
        }
        if self.description.trim().chars().count() < MIN_DESCRIPTION_CHARS {
            return Err(AppError::Validation(format!(
                "description must be at least {MIN_DESCRIPTION_CHARS} characters"
            )));
        }
        Ok(JobPosting {
            title: self.title,
            company: self.company,
            location: self.location,
            url: self.url,
            description: self.description,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDocument {
    pub job_id: Uuid,
    pub content: String,
    pub application: JobApplication,
}

/// POST /api/v1/jobs/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<AnalyzeJobRequest>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    let posting = req.into_posting()?;
    let job = service::analyze_job(&state.db, &state.ai, auth.user_id, posting).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Job>>, AppError> {
    Ok(Json(service::list_jobs(&state.db, auth.user_id).await?))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Job>, AppError> {
    Ok(Json(service::require_job(&state.db, auth.user_id, id).await?))
}

/// POST /api/v1/jobs/:id/tailored-resume
pub async fn handle_tailored_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<GeneratedDocument>, AppError> {
    let application =
        service::generate_tailored_resume(&state.db, &state.ai, auth.user_id, id).await?;
    Ok(Json(GeneratedDocument {
        job_id: id,
        content: application.tailored_resume.clone().unwrap_or_default(),
        application,
    }))
}

/// POST /api/v1/jobs/:id/cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<GeneratedDocument>, AppError> {
    let application =
        service::generate_cover_letter(&state.db, &state.ai, auth.user_id, id).await?;
    Ok(Json(GeneratedDocument {
        job_id: id,
        content: application.cover_letter.clone().unwrap_or_default(),
        application,
    }))
}

/// GET /api/v1/jobs/:id/application
pub async fn handle_get_application(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<JobApplication>, AppError> {
    Ok(Json(service::get_application(&state.db, auth.user_id, id).await?))
}
