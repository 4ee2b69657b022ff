//! LLM Client — the single point of entry for every provider call in CareerKit.
//!
//! ARCHITECTURAL RULE: No other module may call a provider HTTP API directly.
//! Handlers pick a `ModelChoice` (see `routing`) and hand it to `LlmClient`.
//!
//! The client never retries. Moving to another provider after a failure is
//! the caller's job (see `training::fallback`).

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

pub mod gemini;
pub mod openai_compat;
pub mod prompts;

use gemini::GeminiProvider;
use openai_compat::OpenAiCompatProvider;

/// Upper bound for a single HTTP exchange. Callers usually apply a shorter
/// per-attempt timeout on top of this.
const HTTP_TIMEOUT_SECS: u64 = 120;

// ────────────────────────────────────────────────────────────────────────────
// Provider identity
// ────────────────────────────────────────────────────────────────────────────

/// The LLM backends CareerKit can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenRouter,
    Groq,
    Gemini,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenRouter => "openrouter",
            Provider::Groq => "groq",
            Provider::Gemini => "gemini",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relative price bracket of a model. Ordered cheapest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostTier {
    Free,
    Low,
    Standard,
    Premium,
}

/// A concrete backend + model to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelChoice {
    pub provider: Provider,
    pub model: &'static str,
    pub cost_tier: CostTier,
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No API key configured for {0}")]
    MissingApiKey(Provider),

    #[error("Provider {0} is not registered")]
    UnknownProvider(Provider),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("LLM call timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

/// Coarse failure category, used for log fields and status mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Network,
    Timeout,
    Auth,
    RateLimit,
    Server,
    Client,
    MalformedResponse,
    EmptyResponse,
    MissingKey,
}

impl ErrorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::Network => "network",
            ErrorClass::Timeout => "timeout",
            ErrorClass::Auth => "auth",
            ErrorClass::RateLimit => "rate_limit",
            ErrorClass::Server => "server",
            ErrorClass::Client => "client",
            ErrorClass::MalformedResponse => "malformed_response",
            ErrorClass::EmptyResponse => "empty_response",
            ErrorClass::MissingKey => "missing_key",
        }
    }
}

impl LlmError {
    pub fn class(&self) -> ErrorClass {
        match self {
            LlmError::Http(e) if e.is_timeout() => ErrorClass::Timeout,
            LlmError::Http(e) if e.is_decode() => ErrorClass::MalformedResponse,
            LlmError::Http(_) => ErrorClass::Network,
            LlmError::Api { status, .. } => match status {
                401 | 403 => ErrorClass::Auth,
                429 => ErrorClass::RateLimit,
                s if *s >= 500 => ErrorClass::Server,
                _ => ErrorClass::Client,
            },
            LlmError::Parse(_) => ErrorClass::MalformedResponse,
            LlmError::MissingApiKey(_) | LlmError::UnknownProvider(_) => ErrorClass::MissingKey,
            LlmError::EmptyContent => ErrorClass::EmptyResponse,
            LlmError::Timeout(_) => ErrorClass::Timeout,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Provider trait
// ────────────────────────────────────────────────────────────────────────────

/// One chat completion call: a system prompt, a user prompt and sampling knobs.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub system: &'a str,
    pub user: &'a str,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A single LLM backend. Implementations make exactly one HTTP call per
/// `complete` and return the raw generated text.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    fn provider(&self) -> Provider;

    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Registry of configured providers, shared by all handlers through `AppState`.
#[derive(Clone, Default)]
pub struct LlmClient {
    providers: HashMap<Provider, Arc<dyn ChatProvider>>,
}

impl LlmClient {
    /// Registers all three backends. Providers without a key are still
    /// registered and fail with `MissingApiKey` when called.
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;

        Ok(Self::default()
            .with_provider(Arc::new(OpenAiCompatProvider::openrouter(
                http.clone(),
                config.openrouter_api_key.clone(),
            )))
            .with_provider(Arc::new(OpenAiCompatProvider::groq(
                http.clone(),
                config.groq_api_key.clone(),
            )))
            .with_provider(Arc::new(GeminiProvider::new(
                http,
                config.gemini_api_key.clone(),
            ))))
    }

    /// Adds or replaces the backend for `provider.provider()`.
    pub fn with_provider(mut self, provider: Arc<dyn ChatProvider>) -> Self {
        self.providers.insert(provider.provider(), provider);
        self
    }

    /// Calls the chosen backend once and returns its trimmed text.
    /// Whitespace-only output is reported as `EmptyContent`.
    pub async fn generate_content(
        &self,
        choice: &ModelChoice,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let provider = self
            .providers
            .get(&choice.provider)
            .ok_or(LlmError::UnknownProvider(choice.provider))?;

        let request = CompletionRequest {
            model: choice.model,
            system,
            user,
            temperature,
            max_tokens,
        };

        let text = provider.complete(&request).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(LlmError::EmptyContent);
        }

        debug!(
            provider = %choice.provider,
            model = choice.model,
            chars = text.len(),
            "LLM call succeeded"
        );
        Ok(text.to_string())
    }

    /// `generate_content` bounded by a wall-clock timeout. On expiry the
    /// in-flight request is dropped and `LlmError::Timeout` is returned.
    pub async fn generate_content_within(
        &self,
        timeout: Duration,
        choice: &ModelChoice,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        tokio::time::timeout(
            timeout,
            self.generate_content(choice, system, user, temperature, max_tokens),
        )
        .await
        .map_err(|_| LlmError::Timeout(timeout))?
    }
}

/// Pulls a readable message out of a provider error body shaped like
/// `{"error": {"message": "..."}}`, falling back to the raw body.
pub(crate) fn provider_error_message(body: String) -> String {
    serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or(body)
}

// ────────────────────────────────────────────────────────────────────────────
// Test doubles
// ────────────────────────────────────────────────────────────────────────────
