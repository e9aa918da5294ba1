use anyhow::Result;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Job, JobAnalysis};

pub struct NewJob<'a> {
    pub user_id: Uuid,
    pub title: &'a str,
    pub company: &'a str,
    pub location: Option<&'a str>,
    pub url: Option<&'a str>,
    pub description: &'a str,
    pub analysis: &'a JobAnalysis,
}

pub async fn insert_job(pool: &PgPool, job: NewJob<'_>) -> Result<Job> {
    let row: Job = sqlx::query_as(
        r#"
        INSERT INTO jobs (id, user_id, title, company, location, url, description, analysis)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(job.user_id)
    .bind(job.title)
    .bind(job.company)
    .bind(job.location)
    .bind(job.url)
    .bind(job.description)
    .bind(Json(job.analysis))
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Fetches a job only if it belongs to `user_id`.
pub async fn get_job(pool: &PgPool, user_id: Uuid, job_id: Uuid) -> Result<Option<Job>> {
    let job = sqlx::query_as("SELECT * FROM jobs WHERE id = $1 AND user_id = $2")
        .bind(job_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(job)
}

/// Newest first.
pub async fn list_jobs(pool: &PgPool, user_id: Uuid) -> Result<Vec<Job>> {
    let jobs = sqlx::query_as("SELECT * FROM jobs WHERE user_id = $1 ORDER BY created_at DESC")
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(jobs)
}
