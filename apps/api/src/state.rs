use std::sync::Arc;

use sqlx::PgPool;

use crate::ai::AiServices;
use crate::auth::{IdentityProvider, SessionKeys};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// AI task services over the one model client built at startup.
    pub ai: AiServices,
    pub sessions: SessionKeys,
    /// Pluggable sign-in verifier. Default: Google.
    pub identity: Arc<dyn IdentityProvider>,
}
