pub mod cache;
pub mod generations;
pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;
use crate::tools::handlers::handle_run_tool;
use crate::training::handlers::handle_generate_training_plan;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Training Plan API (provider fallback chain)
        .route(
            "/api/v1/training-plans",
            post(handle_generate_training_plan),
        )
        // Tools API (model selector, single provider)
        .route("/api/v1/tools/:task", post(handle_run_tool))
        .route(
            "/api/v1/generations/:id",
            get(generations::handle_get_generation),
        )
        .route("/api/v1/cache", delete(cache::handle_clear_cache))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::cache::{MemoryCacheStore, ResponseCache};
    use crate::config::Config;
    use crate::llm_client::testing::StubProvider;
    use crate::llm_client::{LlmClient, Provider};
    use crate::repository::testing::InMemoryGenerationRepository;

    fn test_config() -> Config {
        Config {
            database_url: "postgres://unused".to_string(),
            redis_url: None,
            cache_disabled: false,
            cache_ttl_secs: 60,
            openrouter_api_key: None,
            gemini_api_key: None,
            groq_api_key: None,
            provider_timeout_secs: 5,
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    fn state_with(llm: LlmClient, repository: Arc<InMemoryGenerationRepository>) -> AppState {
        AppState {
            llm,
            cache: ResponseCache::new(
                Arc::new(MemoryCacheStore::new(64)),
                Duration::from_secs(60),
            ),
            repository,
            config: test_config(),
        }
    }

    fn failing_providers() -> LlmClient {
        LlmClient::default()
            .with_provider(StubProvider::unauthorized(Provider::OpenRouter))
            .with_provider(StubProvider::unauthorized(Provider::Gemini))
            .with_provider(StubProvider::unauthorized(Provider::Groq))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(state_with(LlmClient::default(), Arc::default()));
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["cacheEnabled"], true);
    }

    #[tokio::test]
    async fn test_malformed_json_is_400_with_error_field() {
        for uri in ["/api/v1/training-plans", "/api/v1/tools/job-description"] {
            let app = build_router(state_with(failing_providers(), Arc::default()));
            let response = app.oneshot(post_json(uri, "{ not json")).await.unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            let body = json_body(response).await;
            assert!(body["error"].is_string(), "{uri}");
            assert_eq!(body["code"], "VALIDATION_ERROR", "{uri}");
        }
    }

    #[tokio::test]
    async fn test_invalid_generation_id_is_json_400() {
        let app = build_router(state_with(LlmClient::default(), Arc::default()));
        let response = app
            .oneshot(
                Request::get("/api/v1/generations/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].is_string());
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_training_plan_falls_back_to_template_when_providers_fail() {
        let repository = Arc::new(InMemoryGenerationRepository::default());
        let app = build_router(state_with(failing_providers(), repository.clone()));
        let response = app
            .oneshot(post_json(
                "/api/v1/training-plans",
                r#"{"title":"X","objectives":["a"],"isPremiumUser":true}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["text"]
            .as_str()
            .unwrap()
            .contains("Training Plan Template"));
        assert_eq!(body["sourceProvider"], "template");
        assert_eq!(repository.rows().len(), 1);
    }

    #[tokio::test]
    async fn test_training_plan_empty_title_is_400() {
        let app = build_router(state_with(failing_providers(), Arc::default()));
        let response = app
            .oneshot(post_json("/api/v1/training-plans", r#"{"title":"  "}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_400() {
        let app = build_router(state_with(failing_providers(), Arc::default()));
        let response = app
            .oneshot(post_json("/api/v1/tools/horoscope", r#"{"input":"x"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("horoscope"));
    }

    #[tokio::test]
    async fn test_tool_provider_failure_is_502() {
        let app = build_router(state_with(failing_providers(), Arc::default()));
        let response = app
            .oneshot(post_json(
                "/api/v1/tools/job-description",
                r#"{"input":"Barista"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(json_body(response).await["code"], "LLM_ERROR");
    }

    #[tokio::test]
    async fn test_tool_output_can_be_fetched_by_id() {
        let llm = LlmClient::default()
            .with_provider(StubProvider::text(Provider::Groq, "JD"));
        let app = build_router(state_with(llm, Arc::default()));

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/v1/tools/job-description",
                r#"{"input":"Barista"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["provider"], "groq");
        assert_eq!(body["costTier"], "free");
        let id = body["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(
                Request::get(format!("/api/v1/generations/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let row = json_body(response).await;
        assert_eq!(row["content"], "JD");
        assert_eq!(row["taskType"], "job-description");
    }

    #[tokio::test]
    async fn test_missing_generation_is_404() {
        let app = build_router(state_with(LlmClient::default(), Arc::default()));
        let response = app
            .oneshot(
                Request::get(format!("/api/v1/generations/{}", uuid::Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_clear_cache_by_pattern() {
        let state = state_with(LlmClient::default(), Arc::default());
        state.cache.set_in_cache("tool:a", &1u32, None).await;
        state.cache.set_in_cache("training-plan:b", &2u32, None).await;
        let app = build_router(state.clone());

        let response = app
            .oneshot(
                Request::delete("/api/v1/cache?pattern=tool:*")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["deleted"], 1);
        assert!(state
            .cache
            .get_from_cache::<u32>("training-plan:b")
            .await
            .is_some());
    }

    #[tokio::test]
    async fn test_clear_cache_with_character_class() {
        let state = state_with(LlmClient::default(), Arc::default());
        for key in ["tool:a", "tool:b", "tool:c"] {
            state.cache.set_in_cache(key, &1u32, None).await;
        }
        let app = build_router(state.clone());

        let response = app
            .oneshot(
                Request::delete("/api/v1/cache?pattern=tool:%5Bab%5D")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["deleted"], 2);
        assert_eq!(state.cache.get_from_cache::<u32>("tool:c").await, Some(1));
    }
}
