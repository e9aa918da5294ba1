use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::AuthUser;
use crate::errors::AppError;
use crate::models::User;
use crate::state::AppState;
use crate::store::users::{self, UpsertUser};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub id_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    if req.id_token.trim().is_empty() {
        return Err(AppError::Validation("idToken is required".to_string()));
    }

    let identity = state.identity.verify(&req.id_token).await?;
    let user = users::upsert_user(
        &state.db,
        UpsertUser {
            external_id: &identity.external_id,
            email: &identity.email,
            display_name: &identity.display_name,
            photo_url: identity.avatar_url.as_deref(),
        },
    )
    .await?;

    let access_token = state.sessions.issue(user.id, &user.email)?;
    info!("User {} signed in", user.id);

    Ok(Json(SessionResponse {
        access_token,
        expires_in: state.sessions.ttl_seconds(),
        user: Some(user),
    }))
}

/// POST /api/v1/auth/refresh
pub async fn handle_refresh(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<SessionResponse>, AppError> {
    let access_token = state.sessions.issue(auth.user_id, &auth.email)?;
    Ok(Json(SessionResponse {
        access_token,
        expires_in: state.sessions.ttl_seconds(),
        user: None,
    }))
}
