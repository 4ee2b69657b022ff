use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::AppQuery;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ClearCacheQuery {
    pub pattern: Option<String>,
}

/// DELETE /api/v1/cache?pattern=training-plan:*
///
/// Pattern is a glob over un-prefixed keys. Omitting it clears every key the
/// service owns.
pub async fn handle_clear_cache(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ClearCacheQuery>,
) -> Json<Value> {
    let pattern = query
        .pattern
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| "*".to_string());

    let deleted = state.cache.clear_cache_pattern(&pattern).await;
    Json(json!({ "pattern": pattern, "deleted": deleted }))
}
