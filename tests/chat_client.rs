use serde_json::json;
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

use seolens::llm::{ChatCompletion, ChatMessage, ChatRequest, HttpChatClient, LlmError, LlmProvider};

fn request(provider: LlmProvider) -> ChatRequest {
    ChatRequest {
        provider,
        model: "test-model".to_string(),
        messages: vec![ChatMessage::user("Pick tags")],
    }
}

#[tokio::test]
async fn test_openai_completion() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "messages": [{ "role": "user", "content": "Pick tags" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": "seo, ai" } }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let endpoint = Url::parse(&mock_server.uri()).unwrap();
    let client = HttpChatClient::new(LlmProvider::OpenAi, &endpoint, Some("sk-test"), 5).unwrap();
    let response = client.complete(request(LlmProvider::OpenAi)).await.unwrap();

    assert_eq!(response.text, "seo, ai");
}

#[tokio::test]
async fn test_ollama_completion_is_not_streamed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({ "model": "test-model", "stream": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "test-model",
            "message": { "role": "assistant", "content": "news" },
            "done": true
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let endpoint = Url::parse(&mock_server.uri()).unwrap();
    let client = HttpChatClient::new(LlmProvider::Ollama, &endpoint, None, 5).unwrap();
    let response = client.complete(request(LlmProvider::Ollama)).await.unwrap();

    assert_eq!(response.text, "news");
}

#[tokio::test]
async fn test_error_status_and_empty_choices() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&mock_server)
        .await;

    let endpoint = Url::parse(&mock_server.uri()).unwrap();
    let client = HttpChatClient::new(LlmProvider::OpenAi, &endpoint, Some("sk-test"), 5).unwrap();

    match client.complete(request(LlmProvider::OpenAi)).await {
        Err(LlmError::HttpStatus { status, snippet, .. }) => {
            assert_eq!(status.as_u16(), 429);
            assert_eq!(snippet, "rate limited");
        }
        other => panic!("Expected HTTP status error, got {other:?}"),
    }

    let err = client.complete(request(LlmProvider::OpenAi)).await.unwrap_err();
    assert!(matches!(err, LlmError::EmptyChoices));
}

#[tokio::test]
async fn test_provider_mismatch_is_rejected_before_sending() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let endpoint = Url::parse(&mock_server.uri()).unwrap();
    let client = HttpChatClient::new(LlmProvider::Ollama, &endpoint, None, 5).unwrap();
    let err = client.complete(request(LlmProvider::OpenAi)).await.unwrap_err();

    assert!(matches!(err, LlmError::ProviderMismatch { .. }));
}
