use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::service;
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::ChatMessage;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

/// POST /api/v1/chat/:job_id/messages
pub async fn handle_send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(job_id): Path<Uuid>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<ChatMessage>, AppError> {
    let content = req.content.trim();
    if content.is_empty() {
        return Err(AppError::Validation("content must not be empty".to_string()));
    }
    let reply = service::send_message(&state.db, &state.ai, auth.user_id, job_id, content).await?;
    Ok(Json(reply))
}

/// GET /api/v1/chat/:job_id/messages
pub async fn handle_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    Ok(Json(service::history(&state.db, auth.user_id, job_id).await?))
}
