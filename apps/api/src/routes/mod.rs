pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::chat::handlers as chat;
use crate::jobs::handlers as jobs;
use crate::state::AppState;
use crate::users::handlers as users;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/refresh", post(auth::handle_refresh))
        // Users & profile
        .route("/api/v1/users/me", get(users::handle_me))
        .route(
            "/api/v1/users/profile",
            get(users::handle_get_profile).put(users::handle_update_profile),
        )
        .route("/api/v1/users/resume", post(users::handle_upload_resume))
        // Jobs
        .route("/api/v1/jobs", get(jobs::handle_list_jobs))
        .route("/api/v1/jobs/analyze", post(jobs::handle_analyze))
        .route("/api/v1/jobs/:id", get(jobs::handle_get_job))
        .route(
            "/api/v1/jobs/:id/tailored-resume",
            post(jobs::handle_tailored_resume),
        )
        .route("/api/v1/jobs/:id/cover-letter", post(jobs::handle_cover_letter))
        .route(
            "/api/v1/jobs/:id/application",
            get(jobs::handle_get_application),
        )
        // Chat
        .route(
            "/api/v1/chat/:job_id/messages",
            get(chat::handle_history).post(chat::handle_send_message),
        )
        .with_state(state)
}
