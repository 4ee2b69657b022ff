//! Single-shot tool generation.
//!
//! Flow: cache lookup → estimate complexity → select_model → generate_content
//! → persist → cache store. No fallback: a provider failure is returned to
//! the caller as `AppError::Llm`.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::{cache_key, ResponseCache};
use crate::errors::AppError;
use crate::llm_client::prompts::build_system_prompt;
use crate::llm_client::{CostTier, LlmClient, Provider};
use crate::models::generation::NewGeneration;
use crate::repository::GenerationRepository;
use crate::routing::selector::DEFAULT_LANGUAGE;
use crate::routing::task::max_tokens_for;
use crate::routing::{estimate_complexity, select_model, Complexity, SelectionCriteria, TaskType};
use crate::tools::prompts::prompts_for;

const MAX_INPUT_CHARS: usize = 20_000;
const MIN_CONTENT_LENGTH: u32 = 50;
const MAX_CONTENT_LENGTH: u32 = 6000;

fn default_prioritize_cost() -> bool {
    true
}

/// Request body shared by every tool endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolRequest {
    pub input: String,
    pub language: Option<String>,
    /// Overrides the heuristic estimate.
    pub complexity: Option<Complexity>,
    /// Expected output size in words.
    pub content_length: Option<u32>,
    #[serde(default = "default_prioritize_cost")]
    pub prioritize_cost: bool,
    #[serde(default)]
    pub force_refresh: bool,
}

impl ToolRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let input = self.input.trim();
        if input.is_empty() {
            return Err(AppError::Validation("input cannot be empty".to_string()));
        }
        if input.chars().count() > MAX_INPUT_CHARS {
            return Err(AppError::Validation(format!(
                "input must be at most {MAX_INPUT_CHARS} characters"
            )));
        }
        if let Some(length) = self.content_length {
            if !(MIN_CONTENT_LENGTH..=MAX_CONTENT_LENGTH).contains(&length) {
                return Err(AppError::Validation(format!(
                    "contentLength must be between {MIN_CONTENT_LENGTH} and {MAX_CONTENT_LENGTH}"
                )));
            }
        }
        Ok(())
    }

    fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    fn cache_key(&self, task: TaskType) -> String {
        let complexity = self.complexity.map(|c| format!("{c:?}")).unwrap_or_default();
        let length = self
            .content_length
            .map(|l| l.to_string())
            .unwrap_or_default();
        let cost = if self.prioritize_cost { "cost" } else { "quality" };
        cache_key(
            &format!("tool:{}", task.slug()),
            &[
                self.input.trim(),
                self.language(),
                complexity.as_str(),
                length.as_str(),
                cost,
            ],
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub content: String,
    pub provider: Provider,
    pub model: String,
    pub cost_tier: CostTier,
    pub cached: bool,
}

pub struct ToolDeps<'a> {
    pub llm: &'a LlmClient,
    pub cache: &'a ResponseCache,
    pub repository: &'a dyn GenerationRepository,
    pub timeout: Duration,
}

pub async fn generate_tool_content(
    deps: ToolDeps<'_>,
    task: TaskType,
    request: ToolRequest,
) -> Result<ToolResponse, AppError> {
    let key = request.cache_key(task);

    if request.force_refresh {
        deps.cache.delete_from_cache(&key).await;
    } else if let Some(mut hit) = deps.cache.get_from_cache::<ToolResponse>(&key).await {
        hit.cached = true;
        return Ok(hit);
    }

    let input = request.input.trim();
    let complexity = request
        .complexity
        .unwrap_or_else(|| estimate_complexity(input));
    let content_length = request
        .content_length
        .unwrap_or_else(|| task.default_content_length());

    let choice = select_model(&SelectionCriteria {
        task_type: task,
        complexity: Some(complexity),
        content_length: Some(content_length),
        language: Some(request.language()),
        prioritize_cost: request.prioritize_cost,
    });
    info!(
        task = task.slug(),
        complexity = ?complexity,
        provider = %choice.provider,
        model = choice.model,
        "Selected model for tool request"
    );

    let (base_system, template) = prompts_for(task);
    let system = build_system_prompt(base_system, request.language());
    let user = template.replace("{input}", input);

    let content = deps
        .llm
        .generate_content_within(
            deps.timeout,
            &choice,
            &system,
            &user,
            task.temperature(),
            max_tokens_for(content_length),
        )
        .await?;

    let id = match deps
        .repository
        .insert(&NewGeneration {
            task_type: task,
            title: None,
            prompt: input.to_string(),
            content: content.clone(),
            source: choice.provider.as_str().to_string(),
            model: Some(choice.model.to_string()),
            language: request.language().to_string(),
            is_premium_user: false,
        })
        .await
    {
        Ok(id) => Some(id),
        Err(e) => {
            warn!(task = task.slug(), "Failed to persist tool output: {e}");
            None
        }
    };

    let response = ToolResponse {
        id,
        content,
        provider: choice.provider,
        model: choice.model.to_string(),
        cost_tier: choice.cost_tier,
        cached: false,
    };
    deps.cache.set_in_cache(&key, &response, None).await;

    Ok(response)
}
