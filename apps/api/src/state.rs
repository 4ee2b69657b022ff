use std::sync::Arc;

use crate::cache::ResponseCache;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::repository::GenerationRepository;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// Disabled (no-op) when `CACHE_DISABLED` is set.
    pub cache: ResponseCache,
    pub repository: Arc<dyn GenerationRepository>,
    pub config: Config,
}
