//! LLM client tests against mocked HTTP upstreams
//!
//! These tests use wiremock to stand in for the chat completions and Ollama
//! endpoints and validate:
//! - Request shape (auth header, model, token limit)
//! - Reply extraction
//! - Error mapping to `AppError::Completion`
//! - Pipeline degradation when the upstream misbehaves

mod common;

use ares_research::llm::ollama::OllamaClient;
use ares_research::llm::openai::OpenAIClient;
use ares_research::llm::{GenerationParams, LLMClient, Provider};
use ares_research::research::ResearchCoordinator;
use ares_research::types::{AppError, FallbackReason, Origin};
use common::mocks::{article_html, test_config, MockPageFetcher, MockSearchClient};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============= Helper Functions =============

/// Create a chat completions response with a single choice
fn mock_completion(content: &str) -> serde_json::Value {
    json!({
        "id": "cmpl-123",
        "object": "chat.completion",
        "model": "mistral-small-latest",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

fn mistral_client(server: &MockServer, api_key: Option<&str>) -> OpenAIClient {
    OpenAIClient::new(
        "Mistral",
        api_key.map(str::to_string),
        &format!("{}/v1", server.uri()),
        "mistral-small-latest".to_string(),
        Duration::from_secs(5),
    )
    .unwrap()
}

// ============= Chat Completions =============

#[tokio::test]
async fn test_chat_completion_request_and_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "mistral-small-latest",
            "max_tokens": 1000,
            "messages": [{"role": "user", "content": "Bonjour"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_completion("Salut !")))
        .expect(1)
        .mount(&server)
        .await;

    let client = mistral_client(&server, Some("test-key"));
    let reply = client
        .complete("Bonjour", &GenerationParams::new(0.3, 1000))
        .await
        .unwrap();

    assert_eq!(reply, "Salut !");
    assert_eq!(client.model_name(), "mistral-small-latest");
}

#[tokio::test]
async fn test_chat_completion_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let result = mistral_client(&server, Some("test-key"))
        .generate("Bonjour")
        .await;

    match result {
        Err(AppError::Completion(message)) => {
            assert!(message.contains("429"));
            assert!(message.contains("rate limited"));
        }
        other => panic!("expected completion error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_chat_completion_without_choices() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let result = mistral_client(&server, Some("test-key"))
        .generate("Bonjour")
        .await;

    assert!(matches!(result, Err(AppError::Completion(_))));
}

#[tokio::test]
async fn test_missing_api_key_never_reaches_upstream() {
    let server = MockServer::start().await;

    let result = mistral_client(&server, None).generate("Bonjour").await;

    assert!(matches!(result, Err(AppError::Completion(_))));
    let received = server.received_requests().await.unwrap();
    assert!(received.is_empty());
}

#[tokio::test]
async fn test_provider_builds_client_for_base_url() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_completion("ok")))
        .mount(&server)
        .await;

    let provider = Provider::OpenAI {
        api_key: Some("sk-test".to_string()),
        api_base: format!("{}/v1/", server.uri()),
        model: "gpt-4o-mini".to_string(),
    };
    let client = provider.create_client(Duration::from_secs(5)).unwrap();

    assert_eq!(client.generate("ping").await.unwrap(), "ok");
    assert_eq!(client.model_name(), "gpt-4o-mini");
}

// ============= Ollama =============

#[tokio::test]
async fn test_ollama_chat() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "model": "llama3.2",
            "stream": false,
            "options": {"num_predict": 800}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3.2",
            "created_at": "2024-01-01T00:00:00Z",
            "message": {"role": "assistant", "content": "Voici la synthèse."},
            "done": true
        })))
        .mount(&server)
        .await;

    let client = OllamaClient::new(&server.uri(), "llama3.2".to_string(), Duration::from_secs(5))
        .unwrap();
    let reply = client
        .complete("Résume", &GenerationParams::new(0.4, 800))
        .await
        .unwrap();

    assert_eq!(reply, "Voici la synthèse.");
}

#[tokio::test]
async fn test_ollama_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&server)
        .await;

    let client = OllamaClient::new(&server.uri(), "llama3.2".to_string(), Duration::from_secs(5))
        .unwrap();

    assert!(matches!(
        client.generate("Résume").await,
        Err(AppError::Completion(_))
    ));
}

// ============= Pipeline Degradation =============

#[tokio::test]
async fn test_pipeline_survives_prose_replies() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(mock_completion("Je ne peux pas répondre en JSON.")),
        )
        .mount(&server)
        .await;

    let llm = Arc::new(mistral_client(&server, Some("test-key")));
    let coordinator = ResearchCoordinator::new(
        &test_config(),
        llm,
        Arc::new(MockSearchClient::with_sites(2)),
        Arc::new(MockPageFetcher::serving(&article_html(
            "Prix",
            "Le prix du gazole a baissé de 3 centimes cette semaine en France.",
        ))),
    );

    let bundle = coordinator.research("prix gazole").await.unwrap();

    for origin in [&bundle.plan_origin, &bundle.synthesis_origin] {
        assert!(matches!(
            origin,
            Origin::Heuristic {
                reason: FallbackReason::MalformedUpstreamResponse { .. }
            }
        ));
    }
    assert!(!bundle.plan.search_queries.is_empty());
    assert!((0.0..=1.0).contains(&bundle.synthesis.confidence));
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}
