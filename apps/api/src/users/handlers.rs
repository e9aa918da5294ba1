use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::header::CONTENT_TYPE,
    Json,
};
use serde::Deserialize;

use super::{service, upload};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::{ParsedProfile, Profile, User};
use crate::state::AppState;

const RESUME_FIELD: &str = "file";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeTextRequest {
    pub resume_text: String,
}

/// GET /api/v1/users/me
pub async fn handle_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<User>, AppError> {
    Ok(Json(service::get_user(&state.db, auth.user_id).await?))
}

/// GET /api/v1/users/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Profile>, AppError> {
    Ok(Json(service::get_profile(&state.db, auth.user_id).await?))
}

/// PUT /api/v1/users/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(update): Json<ParsedProfile>,
) -> Result<Json<Profile>, AppError> {
    Ok(Json(
        service::update_profile(&state.db, auth.user_id, update).await?,
    ))
}

/// POST /api/v1/users/resume
///
/// Accepts either `multipart/form-data` with a `file` part (PDF or text) or a
/// JSON body `{"resumeText": "..."}`.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    req: Request,
) -> Result<Json<Profile>, AppError> {
    let is_multipart = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    let resume_text = if is_multipart {
        let multipart = Multipart::from_request(req, &state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        read_resume_part(multipart).await?
    } else {
        let Json(body) = Json::<ResumeTextRequest>::from_request(req, &state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        if body.resume_text.trim().is_empty() {
            return Err(AppError::Validation("resumeText must not be empty".to_string()));
        }
        body.resume_text
    };

    let profile =
        service::import_resume(&state.db, &state.ai, auth.user_id, &resume_text).await?;
    Ok(Json(profile))
}

async fn read_resume_part(mut multipart: Multipart) -> Result<String, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        return upload::resume_text(file_name.as_deref(), content_type.as_deref(), &data);
    }
    Err(AppError::Validation(format!(
        "multipart body has no '{RESUME_FIELD}' part"
    )))
}
