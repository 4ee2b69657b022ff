mod cache;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod repository;
mod routes;
mod routing;
mod state;
mod tools;
mod training;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cache::{MemoryCacheStore, RedisCacheStore, ResponseCache};
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::repository::PgGenerationRepository;
use crate::routes::build_router;
use crate::state::AppState;

/// Entry cap for the in-process cache used when no Redis URL is configured.
const MEMORY_CACHE_ENTRIES: u64 = 1000;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CareerKit API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    let repository = Arc::new(PgGenerationRepository::new(db));

    let cache = build_cache(&config);

    // Initialize LLM client
    let llm = LlmClient::from_config(&config)?;
    for (name, key) in [
        ("OPENROUTER_API_KEY", &config.openrouter_api_key),
        ("GEMINI_API_KEY", &config.gemini_api_key),
        ("GROQ_API_KEY", &config.groq_api_key),
    ] {
        if key.is_none() {
            warn!("{name} is not set; calls to that provider will fail");
        }
    }
    info!(
        "LLM client initialized (attempt timeout: {}s)",
        config.provider_timeout_secs
    );

    let state = AppState {
        llm,
        cache,
        repository,
        config: config.clone(),
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

/// Redis when `REDIS_URL` is set, the in-process store otherwise.
/// A malformed Redis URL degrades to the in-process store rather than
/// refusing to start.
fn build_cache(config: &Config) -> ResponseCache {
    if config.cache_disabled {
        info!("Response cache disabled");
        return ResponseCache::disabled();
    }

    let ttl = config.cache_ttl();
    match config.redis_url.as_deref().map(RedisCacheStore::open) {
        Some(Ok(store)) => {
            info!("Response cache: redis (ttl {}s)", ttl.as_secs());
            ResponseCache::new(Arc::new(store), ttl)
        }
        Some(Err(e)) => {
            warn!("Invalid REDIS_URL, using in-memory cache: {e}");
            ResponseCache::new(Arc::new(MemoryCacheStore::new(MEMORY_CACHE_ENTRIES)), ttl)
        }
        None => {
            info!("Response cache: in-memory (ttl {}s)", ttl.as_secs());
            ResponseCache::new(Arc::new(MemoryCacheStore::new(MEMORY_CACHE_ENTRIES)), ttl)
        }
    }
}
