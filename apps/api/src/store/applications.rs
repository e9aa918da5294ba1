use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{ApplicationStatus, JobApplication};

/// Which generated document to store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Document {
    TailoredResume,
    CoverLetter,
}

impl Document {
    fn column(&self) -> &'static str {
        match self {
            Document::TailoredResume => "tailored_resume",
            Document::CoverLetter => "cover_letter",
        }
    }
}

/// Stores `content` on the (user, job) application, creating it as a draft
/// when none exists yet. The other document column is left untouched.
pub async fn save_document(
    pool: &PgPool,
    user_id: Uuid,
    job_id: Uuid,
    document: Document,
    content: &str,
) -> Result<JobApplication> {
    let column = document.column();
    let sql = format!(
        r#"
        INSERT INTO job_applications (id, user_id, job_id, {column}, status)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id, job_id) DO UPDATE
            SET {column} = EXCLUDED.{column}, updated_at = now()
        RETURNING *
        "#
    );

    let application: JobApplication = sqlx::query_as(&sql)
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(job_id)
        .bind(content)
        .bind(ApplicationStatus::Draft.as_str())
        .fetch_one(pool)
        .await?;
    Ok(application)
}

pub async fn get_application(
    pool: &PgPool,
    user_id: Uuid,
    job_id: Uuid,
) -> Result<Option<JobApplication>> {
    let application =
        sqlx::query_as("SELECT * FROM job_applications WHERE user_id = $1 AND job_id = $2")
            .bind(user_id)
            .bind(job_id)
            .fetch_optional(pool)
            .await?;
    Ok(application)
}
