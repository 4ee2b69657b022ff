//! Google AI Gemini backend (`models/{model}:generateContent`).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{provider_error_message, ChatProvider, CompletionRequest, LlmError, Provider};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        (!text.is_empty()).then_some(text)
    }
}

pub struct GeminiProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GeminiProvider {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: GEMINI_API_BASE.to_string(),
            api_key,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, LlmError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(LlmError::MissingApiKey(Provider::Gemini))?;

        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: [Part {
                    text: request.system,
                }],
            },
            contents: [Content {
                role: Some("user"),
                parts: [Part { text: request.user }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            },
        };

        // Key goes in a header so it never ends up in URL-bearing logs.
        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, request.model
            ))
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Gemini API returned {}", status);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: provider_error_message(body),
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        parsed.into_text().ok_or(LlmError::EmptyContent)
    }
}

#[cfg(test)]
mod tests {
    use axum::{extract::Path, http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::llm_client::testing::serve_mock;

    fn request() -> CompletionRequest<'static> {
        CompletionRequest {
            model: "gemini-1.5-flash",
            system: "You are a training designer.",
            user: "Plan for onboarding",
            temperature: 0.4,
            max_tokens: 2048,
        }
    }

    #[test]
    fn test_request_uses_gemini_field_names() {
        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: [Part { text: "sys" }],
            },
            contents: [Content {
                role: Some("user"),
                parts: [Part { text: "hi" }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.5,
                max_output_tokens: 64,
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "sys");
        assert!(value["systemInstruction"].get("role").is_none());
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 64);
    }

    #[test]
    fn test_response_joins_parts_of_first_candidate() {
        let parsed: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [{"text": "Module 1. "}, {"text": "Module 2."}]}
            }]
        }))
        .unwrap();
        assert_eq!(parsed.into_text().as_deref(), Some("Module 1. Module 2."));
    }

    #[test]
    fn test_blocked_candidate_has_no_text() {
        let parsed: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap();
        assert!(parsed.into_text().is_none());
    }

    #[tokio::test]
    async fn test_complete_posts_to_model_path_with_key_header() {
        let router = Router::new().route(
            "/models/:call",
            post(
                |Path(call): Path<String>, headers: HeaderMap, Json(body): Json<Value>| async move {
                    if call != "gemini-1.5-flash:generateContent"
                        || headers.get("x-goog-api-key").map(|v| v.as_bytes()) != Some(b"k")
                    {
                        return (StatusCode::BAD_REQUEST, Json(json!({})));
                    }
                    assert_eq!(body["contents"][0]["parts"][0]["text"], "Plan for onboarding");
                    (
                        StatusCode::OK,
                        Json(json!({"candidates": [{"content": {"parts": [{"text": "Gemini plan"}]}}]})),
                    )
                },
            ),
        );
        let base = serve_mock(router).await;

        let provider = GeminiProvider::new(Client::new(), Some("k".into())).with_base_url(base);
        assert_eq!(provider.complete(&request()).await.unwrap(), "Gemini plan");
    }

    #[tokio::test]
    async fn test_complete_reports_invalid_key() {
        let router = Router::new().route(
            "/models/:call",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": {"message": "API key not valid"}})),
                )
            }),
        );
        let base = serve_mock(router).await;

        let provider = GeminiProvider::new(Client::new(), Some("bad".into())).with_base_url(base);
        let err = provider.complete(&request()).await.unwrap_err();
        assert!(matches!(
            err,
            LlmError::Api { status: 400, ref message } if message == "API key not valid"
        ));
    }
}
