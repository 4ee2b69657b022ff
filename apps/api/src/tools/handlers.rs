//! Axum route handlers for the Tools API.

use axum::{extract::State, Json};

use crate::errors::{AppError, AppJson, AppPath};
use crate::routing::TaskType;
use crate::state::AppState;
use crate::tools::generator::{generate_tool_content, ToolDeps, ToolRequest, ToolResponse};

/// POST /api/v1/tools/:task
///
/// `:task` is a task slug such as `job-description` or `interview-prep`.
/// Provider failures surface as 502.
pub async fn handle_run_tool(
    State(state): State<AppState>,
    AppPath(task): AppPath<String>,
    AppJson(request): AppJson<ToolRequest>,
) -> Result<Json<ToolResponse>, AppError> {
    let task = TaskType::from_slug(&task)
        .ok_or_else(|| AppError::Validation(format!("Unknown tool '{task}'")))?;
    request.validate()?;

    let deps = ToolDeps {
        llm: &state.llm,
        cache: &state.cache,
        repository: state.repository.as_ref(),
        timeout: state.config.provider_timeout(),
    };

    Ok(Json(generate_tool_content(deps, task, request).await?))
}
