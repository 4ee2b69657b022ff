//! Axum route handlers for the Training Plan API.

use axum::{extract::State, Json};

use crate::errors::{AppError, AppJson};
use crate::state::AppState;
use crate::training::generator::{
    generate_training_plan, TrainingPlanDeps, TrainingPlanRequest, TrainingPlanResponse,
};

/// POST /api/v1/training-plans
///
/// Always 200 for a valid body: provider failures fall through to the
/// template. Only validation errors are surfaced.
pub async fn handle_generate_training_plan(
    State(state): State<AppState>,
    AppJson(request): AppJson<TrainingPlanRequest>,
) -> Result<Json<TrainingPlanResponse>, AppError> {
    request.validate()?;

    let deps = TrainingPlanDeps {
        llm: &state.llm,
        cache: &state.cache,
        repository: state.repository.as_ref(),
        attempt_timeout: state.config.provider_timeout(),
    };

    Ok(Json(generate_training_plan(deps, request).await))
}
