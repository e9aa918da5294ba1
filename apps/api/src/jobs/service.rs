use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::ai::AiServices;
use crate::errors::AppError;
use crate::models::{Job, JobApplication, Profile};
use crate::store::applications::{self, Document};
use crate::store::{jobs, profiles};
use crate::store::jobs::NewJob;

/// A job posting as submitted for analysis.
#[derive(Debug, Clone)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub url: Option<String>,
    pub description: String,
}

pub(crate) async fn require_profile(db: &PgPool, user_id: Uuid) -> Result<Profile, AppError> {
    profiles::get_profile(db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User profile not found".to_string()))
}

/// Fetches a job, treating another user's job exactly like a missing one.
pub async fn require_job(db: &PgPool, user_id: Uuid, job_id: Uuid) -> Result<Job, AppError> {
    jobs::get_job(db, user_id, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}

/// Profile → AI match analysis → stored job.
pub async fn analyze_job(
    db: &PgPool,
    ai: &AiServices,
    user_id: Uuid,
    posting: JobPosting,
) -> Result<Job, AppError> {
    let profile = require_profile(db, user_id).await?;

    let analysis = ai.analyze_job_match(&posting.description, &profile).await?;
    info!(
        "Analyzed '{}' at {} for user {user_id}: score {}",
        posting.title, posting.company, analysis.match_score
    );

    let job = jobs::insert_job(
        db,
        NewJob {
            user_id,
            title: &posting.title,
            company: &posting.company,
            location: posting.location.as_deref(),
            url: posting.url.as_deref(),
            description: &posting.description,
            analysis: &analysis,
        },
    )
    .await?;
    Ok(job)
}

pub async fn list_jobs(db: &PgPool, user_id: Uuid) -> Result<Vec<Job>, AppError> {
    Ok(jobs::list_jobs(db, user_id).await?)
}

pub async fn generate_tailored_resume(
    db: &PgPool,
    ai: &AiServices,
    user_id: Uuid,
    job_id: Uuid,
) -> Result<JobApplication, AppError> {
    let job = require_job(db, user_id, job_id).await?;
    let profile = require_profile(db, user_id).await?;

    let resume = ai.generate_tailored_resume(&job.description, &profile).await?;
    let application =
        applications::save_document(db, user_id, job_id, Document::TailoredResume, &resume)
            .await?;
    info!("Stored tailored resume for job {job_id} ({} chars)", resume.len());
    Ok(application)
}

pub async fn generate_cover_letter(
    db: &PgPool,
    ai: &AiServices,
    user_id: Uuid,
    job_id: Uuid,
) -> Result<JobApplication, AppError> {
    let job = require_job(db, user_id, job_id).await?;
    let profile = require_profile(db, user_id).await?;

    let letter = ai.generate_cover_letter(&job.description, &profile).await?;
    let application =
        applications::save_document(db, user_id, job_id, Document::CoverLetter, &letter).await?;
    info!("Stored cover letter for job {job_id} ({} chars)", letter.len());
    Ok(application)
}

pub async fn get_application(
    db: &PgPool,
    user_id: Uuid,
    job_id: Uuid,
) -> Result<JobApplication, AppError> {
    require_job(db, user_id, job_id).await?;
    applications::get_application(db, user_id, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No application documents for job {job_id}")))
}
