//! OpenAI-compatible chat completions backend, shared by OpenRouter and Groq.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{provider_error_message, ChatProvider, CompletionRequest, LlmError, Provider};

pub const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";
pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Sent to OpenRouter so usage shows up under this app in their dashboard.
const OPENROUTER_APP_TITLE: &str = "CareerKit";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

impl ChatCompletionResponse {
    fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
    }
}

/// Talks to any `/chat/completions` endpoint that follows the OpenAI schema.
pub struct OpenAiCompatProvider {
    client: Client,
    provider: Provider,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiCompatProvider {
    pub fn openrouter(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            provider: Provider::OpenRouter,
            base_url: OPENROUTER_API_BASE.to_string(),
            api_key,
        }
    }

    pub fn groq(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            provider: Provider::Groq,
            base_url: GROQ_API_BASE.to_string(),
            api_key,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl ChatProvider for OpenAiCompatProvider {
    fn provider(&self) -> Provider {
        self.provider
    }

    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, LlmError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(LlmError::MissingApiKey(self.provider))?;

        let body = ChatCompletionRequest {
            model: request.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: request.system,
                },
                ChatMessage {
                    role: "user",
                    content: request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let mut http = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body);
        if self.provider == Provider::OpenRouter {
            http = http.header("X-Title", OPENROUTER_APP_TITLE);
        }

        let response = http.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("{} API returned {}", self.provider, status);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: provider_error_message(body),
            });
        }

        let parsed: ChatCompletionResponse = response.json().await?;
        parsed.into_text().ok_or(LlmError::EmptyContent)
    }
}
