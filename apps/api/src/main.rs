mod ai;
mod auth;
mod chat;
mod coercion;
mod config;
mod db;
mod errors;
mod jobs;
mod llm_client;
mod models;
mod prompt;
mod routes;
mod state;
mod store;
mod users;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ai::AiServices;
use crate::auth::{GoogleIdentityProvider, SessionKeys};
use crate::coercion::Coercer;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ResumeFi API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url).await?;

    // Initialize the one LLM client every task shares
    let llm = LlmClient::new(
        config.anthropic_api_key.clone(),
        config.llm_model.clone(),
        config.llm_max_tokens,
    )?;
    info!(
        "LLM client initialized (model: {}, max_tokens: {}, json_repair: {})",
        config.llm_model, config.llm_max_tokens, config.llm_json_repair
    );
    let ai = AiServices::new(Arc::new(llm), Coercer::with_repair(config.llm_json_repair));

    let identity = Arc::new(GoogleIdentityProvider::new(config.google_client_id.clone())?);
    let sessions = SessionKeys::new(&config.jwt_secret, config.jwt_ttl_hours);

    // Build app state
    let state = AppState {
        db,
        ai,
        sessions,
        identity,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
