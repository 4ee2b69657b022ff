//! Training plan pipeline.
//!
//! Flow: validate → cache lookup → fallback chain → persist → cache store.
//!
//! Never fails once the request is valid: provider failures are absorbed by
//! the fallback chain, and cache or persistence failures are logged and
//! skipped.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::{cache_key, ResponseCache};
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::generation::NewGeneration;
use crate::repository::GenerationRepository;
use crate::routing::selector::DEFAULT_LANGUAGE;
use crate::routing::TaskType;
use crate::training::fallback::{generate_training_plan_with_fallback, SourceProvider};

const MAX_TITLE_CHARS: usize = 200;
const MAX_OBJECTIVES: usize = 20;
const CACHE_NAMESPACE: &str = "training-plan";

/// Request body for training plan generation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPlanRequest {
    pub title: String,
    #[serde(default)]
    pub objectives: Vec<String>,
    pub duration: Option<String>,
    pub audience: Option<String>,
    pub level: Option<String>,
    pub language: Option<String>,
    /// Accepted and stored with the record. Not used for gating.
    #[serde(default)]
    pub is_premium_user: bool,
    /// Skip and overwrite any cached plan for the same inputs.
    #[serde(default)]
    pub force_refresh: bool,
}

impl TrainingPlanRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("title cannot be empty".to_string()));
        }
        if title.chars().count() > MAX_TITLE_CHARS {
            return Err(AppError::Validation(format!(
                "title must be at most {MAX_TITLE_CHARS} characters"
            )));
        }
        if self.objectives.len() > MAX_OBJECTIVES {
            return Err(AppError::Validation(format!(
                "at most {MAX_OBJECTIVES} objectives are allowed"
            )));
        }
        Ok(())
    }

    fn cache_key(&self) -> String {
        let count = self.objectives.len().to_string();
        let mut parts = vec![
            self.title.trim(),
            self.duration.as_deref().unwrap_or_default(),
            self.audience.as_deref().unwrap_or_default(),
            self.level.as_deref().unwrap_or_default(),
            self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE),
            count.as_str(),
        ];
        parts.extend(self.objectives.iter().map(String::as_str));
        cache_key(CACHE_NAMESPACE, &parts)
    }
}

/// Response body. `id` is absent when persistence failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPlanResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub text: String,
    pub source_provider: SourceProvider,
    pub cached: bool,
}

/// Dependencies of the pipeline, borrowed from `AppState`.
pub struct TrainingPlanDeps<'a> {
    pub llm: &'a LlmClient,
    pub cache: &'a ResponseCache,
    pub repository: &'a dyn GenerationRepository,
    pub attempt_timeout: Duration,
}

pub async fn generate_training_plan(
    deps: TrainingPlanDeps<'_>,
    request: TrainingPlanRequest,
) -> TrainingPlanResponse {
    let key = request.cache_key();

    if request.force_refresh {
        deps.cache.delete_from_cache(&key).await;
    } else {
        let cached: Option<TrainingPlanResponse> = deps.cache.get_from_cache(&key).await;
        if let Some(mut hit) = cached {
            info!("Serving cached training plan for '{}'", request.title.trim());
            hit.cached = true;
            return hit;
        }
    }

    let result =
        generate_training_plan_with_fallback(deps.llm, &request, deps.attempt_timeout).await;

    let new_generation = NewGeneration {
        task_type: TaskType::TrainingPlan,
        title: Some(request.title.trim().to_string()),
        prompt: request.objectives.join("\n"),
        content: result.text.clone(),
        source: result.source_provider.as_str().to_string(),
        model: result.model.clone(),
        language: request
            .language
            .clone()
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
        is_premium_user: request.is_premium_user,
    };
    let id = match deps.repository.insert(&new_generation).await {
        Ok(id) => Some(id),
        Err(e) => {
            warn!("Failed to persist training plan: {e}");
            None
        }
    };

    let response = TrainingPlanResponse {
        id,
        text: result.text,
        source_provider: result.source_provider,
        cached: false,
    };

    // Template output is not a successful generation; retry providers next time.
    if response.source_provider != SourceProvider::Template {
        deps.cache.set_in_cache(&key, &response, None).await;
    }

    response
}
