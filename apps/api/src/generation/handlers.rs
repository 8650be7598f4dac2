//! Axum route handlers for the Generation API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::generator::{generate_post, GeneratedPost};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GeneratePostRequest {
    pub topic: String,
}

/// POST /generate-post
///
/// Fetches recent news for the topic and generates a title, meta description and body.
/// A body that fails extraction is rejected before any outbound call.
pub async fn handle_generate_post(
    State(state): State<AppState>,
    payload: Result<Json<GeneratePostRequest>, JsonRejection>,
) -> Result<Json<GeneratedPost>, AppError> {
    let Json(request) = payload?;

    let span = info_span!("generate_post", request_id = %Uuid::new_v4());
    async move {
        info!(
            "Received request to generate post for topic: {}",
            request.topic
        );

        let post = generate_post(
            state.news.as_ref(),
            state.llm.as_ref(),
            state.generation,
            &request.topic,
        )
        .await?;

        Ok::<_, AppError>(Json(post))
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::config::Config;
    use crate::routes::build_router;
    use crate::state::AppState;

    const TITLE_MARKER: &str = "engaging and accurate title";
    const META_MARKER: &str = "Write a meta description";
    const BODY_MARKER: &str = "Write a detailed article";

    struct Providers {
        news: MockServer,
        openai: MockServer,
    }

    impl Providers {
        async fn start() -> Self {
            Self {
                news: MockServer::start().await,
                openai: MockServer::start().await,
            }
        }

        fn state(&self) -> AppState {
            let news_uri = self.news.uri();
            let openai_uri = self.openai.uri();
            let config = Config::from_lookup(move |key| match key {
                "OPENAI_API_KEY" => Some("sk-test".to_string()),
                "CURRENTS_API_KEY" => Some("cur-test".to_string()),
                "OPENAI_BASE_URL" => Some(openai_uri.clone()),
                "CURRENTS_BASE_URL" => Some(news_uri.clone()),
                "OPENAI_TIMEOUT_SECS" => Some("5".to_string()),
                _ => None,
            })
            .unwrap();
            AppState::from_config(&config).unwrap()
        }

        async fn news_returns(&self, titles: &[&str]) {
            let news: Vec<_> = titles
                .iter()
                .map(|t| serde_json::json!({ "title": t }))
                .collect();
            Mock::given(method("GET"))
                .and(path("/latest-news"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(serde_json::json!({ "status": "ok", "news": news })),
                )
                .expect(1)
                .mount(&self.news)
                .await;
        }

        async fn completion_for(&self, marker: &str, content: &str, calls: u64) {
            Mock::given(method("POST"))
                .and(path("/chat/completions"))
                .and(body_string_contains(marker))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "choices": [{ "message": { "role": "assistant", "content": content } }]
                })))
                .expect(calls)
                .mount(&self.openai)
                .await;
        }

        async fn no_completions(&self) {
            Mock::given(method("POST"))
                .and(path("/chat/completions"))
                .respond_with(ResponseTemplate::new(500))
                .expect(0)
                .mount(&self.openai)
                .await;
        }
    }

    async fn post_json(state: AppState, body: &str) -> (StatusCode, serde_json::Value) {
        let response = build_router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/generate-post")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or_default())
    }

    #[tokio::test]
    async fn test_generates_post_from_news_digest() {
        let providers = Providers::start().await;
        let body = "Trends in AI. ".repeat(120);

        Mock::given(method("GET"))
            .and(path("/latest-news"))
            .and(query_param("keywords", "artificial intelligence"))
            .and(query_param("language", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "news": [{ "title": "A" }, { "title": "B" }, { "title": "C" }]
            })))
            .expect(1)
            .mount(&providers.news)
            .await;

        // The digest reaches the title prompt as JSON-escaped newlines
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_string_contains(TITLE_MARKER))
            .and(body_string_contains("A\\nB\\nC"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "content": "AI in 2026" } }]
            })))
            .expect(1)
            .mount(&providers.openai)
            .await;
        providers
            .completion_for(META_MARKER, "Where AI stands today", 1)
            .await;
        providers.completion_for(BODY_MARKER, &body, 1).await;

        let (status, json) = post_json(
            providers.state(),
            r#"{"topic": "artificial intelligence"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["title"], "AI in 2026");
        assert_eq!(json["meta_description"], "Where AI stands today");
        assert_eq!(json["post_content"], body.trim());
    }

    #[tokio::test]
    async fn test_news_outage_returns_500_without_completions() {
        let providers = Providers::start().await;

        Mock::given(method("GET"))
            .and(path("/latest-news"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
            .expect(1)
            .mount(&providers.news)
            .await;
        providers.no_completions().await;

        let (status, json) = post_json(providers.state(), r#"{"topic": "rust"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let detail = json["detail"].as_str().unwrap();
        assert!(detail.contains("Currents API error"), "detail: {detail}");
    }

    #[tokio::test]
    async fn test_short_body_returns_500_and_no_post() {
        let providers = Providers::start().await;
        providers.news_returns(&["Headline"]).await;
        providers.completion_for(TITLE_MARKER, "Title", 1).await;
        providers.completion_for(META_MARKER, "Meta", 1).await;
        providers
            .completion_for(BODY_MARKER, &"x".repeat(1200), 1)
            .await;

        let (status, json) = post_json(providers.state(), r#"{"topic": "rust"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["detail"], "Generated content is too short or empty");
        assert!(json.get("title").is_none());
        assert!(json.get("post_content").is_none());
    }

    #[tokio::test]
    async fn test_blank_body_returns_500() {
        let providers = Providers::start().await;
        providers.news_returns(&["Headline"]).await;
        providers.completion_for(TITLE_MARKER, "Title", 1).await;
        providers.completion_for(META_MARKER, "Meta", 1).await;
        providers.completion_for(BODY_MARKER, " \n\t ", 1).await;

        let (status, json) = post_json(providers.state(), r#"{"topic": "rust"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["detail"], "Generated content is too short or empty");
    }

    #[tokio::test]
    async fn test_empty_topic_passes_through() {
        let providers = Providers::start().await;
        let body = "Plenty of words here. ".repeat(80);

        Mock::given(method("GET"))
            .and(path("/latest-news"))
            .and(query_param("keywords", ""))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "news": [] })),
            )
            .expect(1)
            .mount(&providers.news)
            .await;
        providers.completion_for(TITLE_MARKER, "Untitled", 1).await;
        providers.completion_for(META_MARKER, "Meta", 1).await;
        providers.completion_for(BODY_MARKER, &body, 1).await;

        let (status, json) = post_json(providers.state(), r#"{"topic": ""}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["title"], "Untitled");
        assert_eq!(json["post_content"], body.trim());
    }

    #[tokio::test]
    async fn test_digest_keeps_first_five_headlines_in_order() {
        let providers = Providers::start().await;
        let body = "Plenty of words here. ".repeat(80);
        providers
            .news_returns(&["H1", "H2", "H3", "H4", "H5", "H6", "H7"])
            .await;

        // The digest is followed by ". " in the title prompt, so H6 cannot follow H5
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_string_contains(TITLE_MARKER))
            .and(body_string_contains("news:\\nH1\\nH2\\nH3\\nH4\\nH5. "))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "content": "Five Stories" } }]
            })))
            .expect(1)
            .mount(&providers.openai)
            .await;
        providers.completion_for(META_MARKER, "Meta", 1).await;
        providers.completion_for(BODY_MARKER, &body, 1).await;

        let (status, json) = post_json(providers.state(), r#"{"topic": "rust"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["title"], "Five Stories");
    }

    #[tokio::test]
    async fn test_empty_title_is_reported_by_name() {
        let providers = Providers::start().await;
        providers.news_returns(&[]).await;
        providers.completion_for(TITLE_MARKER, "   ", 1).await;
        providers.completion_for(META_MARKER, "Meta", 0).await;
        providers.completion_for(BODY_MARKER, "Body", 0).await;

        let (status, json) = post_json(providers.state(), r#"{"topic": "rust"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["detail"], "Failed to generate title: empty response");
    }

    #[tokio::test]
    async fn test_provider_quota_error_is_surfaced() {
        let providers = Providers::start().await;
        providers.news_returns(&["Headline"]).await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": { "message": "You exceeded your current quota" }
            })))
            .expect(1)
            .mount(&providers.openai)
            .await;

        let (status, json) = post_json(providers.state(), r#"{"topic": "rust"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let detail = json["detail"].as_str().unwrap();
        assert!(detail.starts_with("OpenAI API error"), "detail: {detail}");
        assert!(detail.contains("You exceeded your current quota"));
    }

    #[tokio::test]
    async fn test_missing_topic_is_rejected_before_any_call() {
        let providers = Providers::start().await;

        Mock::given(method("GET"))
            .and(path("/latest-news"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&providers.news)
            .await;
        providers.no_completions().await;

        let (status, json) = post_json(providers.state(), r#"{"subject": "rust"}"#).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(json["detail"].as_str().unwrap().contains("topic"));
    }

    #[tokio::test]
    async fn test_non_string_topic_is_rejected() {
        let providers = Providers::start().await;
        providers.no_completions().await;

        let (status, _) = post_json(providers.state(), r#"{"topic": 42}"#).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
