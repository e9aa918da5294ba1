use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::ai::AiServices;
use crate::coercion::OutputSchema;
use crate::errors::AppError;
use crate::models::{ParsedProfile, Profile, User};
use crate::store::{profiles, users};

pub async fn get_user(db: &PgPool, user_id: Uuid) -> Result<User, AppError> {
    users::find_user(db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

pub async fn get_profile(db: &PgPool, user_id: Uuid) -> Result<Profile, AppError> {
    profiles::get_profile(db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User profile not found".to_string()))
}

/// Merges `update` into the stored profile section by section, creating the
/// profile if the user has none yet.
pub async fn update_profile(
    db: &PgPool,
    user_id: Uuid,
    update: ParsedProfile,
) -> Result<Profile, AppError> {
    let mut profile = profiles::get_profile(db, user_id)
        .await?
        .unwrap_or_default();
    profile.merge(update);
    profile
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    profiles::save_profile(db, user_id, &profile).await?;
    Ok(profile)
}

/// Parses resume text with the model and merges the result into the profile.
pub async fn import_resume(
    db: &PgPool,
    ai: &AiServices,
    user_id: Uuid,
    resume_text: &str,
) -> Result<Profile, AppError> {
    let parsed = ai.parse_resume(resume_text).await?;
    info!(
        "Parsed resume for user {user_id}: {} skills, {} experience entries",
        parsed.skills.as_ref().map_or(0, Vec::len),
        parsed.experience.as_ref().map_or(0, Vec::len)
    );
    update_profile(db, user_id, parsed).await
}
