mod audit;
mod catalog;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod pairing;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::audit::PgPairingLogStore;
use crate::catalog::HttpCatalogClient;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::{CompletionSettings, LlmClient};
use crate::pairing::prompts::ShuffledOrder;
use crate::pairing::service::PairingService;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting pairing API v{}", env!("CARGO_PKG_VERSION"));

    let timeout = Duration::from_secs(config.http_timeout_secs);

    // Audit log store (PostgreSQL)
    let db = create_pool(&config.database_url).await?;
    let logs = Arc::new(PgPairingLogStore::new(db));

    // Catalog collaborator
    let catalog = HttpCatalogClient::new(config.catalog_base_url.clone(), timeout)?;
    info!("Catalog client initialized ({})", config.catalog_base_url);

    // Completion provider
    let llm = LlmClient::new(CompletionSettings {
        base_url: config.openai_base_url.clone(),
        api_key: config.openai_api_key.clone(),
        model: config.openai_model.clone(),
        max_tokens: config.llm_max_tokens,
        temperature: config.llm_temperature,
        max_attempts: config.llm_max_attempts,
        timeout,
    })?;
    info!(
        "LLM client initialized (model: {}, temperature: {}, attempts: {})",
        llm.model(),
        config.llm_temperature,
        config.llm_max_attempts
    );

    let pairing = PairingService::new(
        Arc::new(catalog),
        Arc::new(llm),
        logs.clone(),
        Arc::new(ShuffledOrder),
    );

    let state = AppState {
        pairing: Arc::new(pairing),
        logs,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the BFF host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
