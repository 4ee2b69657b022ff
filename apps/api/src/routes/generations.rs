use axum::{extract::State, Json};
use uuid::Uuid;

use crate::errors::{AppError, AppPath};
use crate::models::generation::GenerationRow;
use crate::state::AppState;

/// GET /api/v1/generations/:id
pub async fn handle_get_generation(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<GenerationRow>, AppError> {
    state
        .repository
        .find(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Generation {id} not found")))
}
