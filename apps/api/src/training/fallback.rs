//! Fallback Orchestrator — PRIMARY → SECONDARY → TEMPLATE.
//!
//! Attempts are strictly sequential: the secondary provider is only called
//! after the primary's failure has been observed. Each attempt is bounded by
//! its own timeout. The template stage cannot fail, so every request ends
//! with exactly one `FallbackResult`.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::llm_client::prompts::build_system_prompt;
use crate::llm_client::{LlmClient, ModelChoice};
use crate::routing::selector::{DEFAULT_LANGUAGE, GEMINI_FLASH, OPENROUTER_LLAMA_LARGE};
use crate::routing::task::{max_tokens_for, TaskType};
use crate::training::generator::TrainingPlanRequest;
use crate::training::prompts::{build_training_plan_prompt, TRAINING_PLAN_SYSTEM};
use crate::training::template::render_template;

pub const PRIMARY_MODEL: ModelChoice = OPENROUTER_LLAMA_LARGE;
pub const SECONDARY_MODEL: ModelChoice = GEMINI_FLASH;

/// Which stage produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceProvider {
    Primary,
    Secondary,
    Template,
}

impl SourceProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceProvider::Primary => "primary",
            SourceProvider::Secondary => "secondary",
            SourceProvider::Template => "template",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackResult {
    pub text: String,
    pub source_provider: SourceProvider,
    /// Model that produced `text`; `None` for the template.
    pub model: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FallbackStage {
    Primary,
    Secondary,
    Template,
}

/// Runs the fallback chain for one training plan request.
pub async fn generate_training_plan_with_fallback(
    llm: &LlmClient,
    request: &TrainingPlanRequest,
    attempt_timeout: Duration,
) -> FallbackResult {
    let system = build_system_prompt(
        TRAINING_PLAN_SYSTEM,
        request.language.as_deref().unwrap_or(DEFAULT_LANGUAGE),
    );
    let prompt = build_training_plan_prompt(
        &request.title,
        &request.objectives,
        request.duration.as_deref(),
        request.audience.as_deref(),
        request.level.as_deref(),
    );
    let task = TaskType::TrainingPlan;
    let max_tokens = max_tokens_for(task.default_content_length());

    let attempt = |choice: ModelChoice| {
        let system = &system;
        let prompt = &prompt;
        async move {
            llm.generate_content_within(
                attempt_timeout,
                &choice,
                system,
                prompt,
                task.temperature(),
                max_tokens,
            )
            .await
        }
    };

    let mut stage = FallbackStage::Primary;
    loop {
        stage = match stage {
            FallbackStage::Primary => match attempt(PRIMARY_MODEL).await {
                Ok(text) => return generated(text, SourceProvider::Primary, PRIMARY_MODEL),
                Err(e) => {
                    warn!(
                        provider = %PRIMARY_MODEL.provider,
                        class = e.class().as_str(),
                        "Primary training plan attempt failed: {e}"
                    );
                    FallbackStage::Secondary
                }
            },
            FallbackStage::Secondary => match attempt(SECONDARY_MODEL).await {
                Ok(text) => return generated(text, SourceProvider::Secondary, SECONDARY_MODEL),
                Err(e) => {
                    warn!(
                        provider = %SECONDARY_MODEL.provider,
                        class = e.class().as_str(),
                        "Secondary training plan attempt failed: {e}"
                    );
                    FallbackStage::Template
                }
            },
            FallbackStage::Template => {
                info!("All providers failed, serving template training plan");
                return FallbackResult {
                    text: render_template(request),
                    source_provider: SourceProvider::Template,
                    model: None,
                };
            }
        };
    }
}

fn generated(text: String, source: SourceProvider, choice: ModelChoice) -> FallbackResult {
    info!(
        source = source.as_str(),
        provider = %choice.provider,
        model = choice.model,
        "Training plan generated"
    );
    FallbackResult {
        text,
        source_provider: source,
        model: Some(choice.model.to_string()),
    }
}
