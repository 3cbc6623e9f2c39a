//! The reqwest-backed HTTP client against a local mock server.

use futures::StreamExt;
use tokio_test::assert_ok;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use spotllm_core::infrastructure::llm::{HttpClient, OpenAiClient};
use spotllm_core::{Conversation, DomainError, LlmClient};

#[tokio::test]
async fn completion_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({ "model": "gpt-4o" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "chatcmpl-1",
            "model": "gpt-4o",
            "choices": [{
                "message": { "role": "assistant", "content": "Hello, how can I help you?" },
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiClient::with_base_url(HttpClient::new(), "test-key", "gpt-4o", server.uri());

    let response = client
        .get_response(&Conversation::user_text("Hello"))
        .await;
    let response = assert_ok!(response);
    assert_eq!(response, "Hello, how can I help you?");
}

#[tokio::test]
async fn streaming_concatenates_to_full_reply() {
    let server = MockServer::start().await;

    let sse_body = concat!(
        "data: {\"choices\":[{\"delta\":{\"content\":\"Hello\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\" world\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"!\"}}]}\n\n",
        "data: [DONE]\n\n",
    );

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(sse_body.as_bytes(), "text/event-stream"),
        )
        .mount(&server)
        .await;

    let client = OpenAiClient::with_base_url(HttpClient::new(), "test-key", "gpt-4o", server.uri());

    let mut stream = client
        .stream_response(&Conversation::user_text("Hello"))
        .await
        .unwrap();

    // Network framing may merge deltas into one chunk; order and
    // concatenation are the contract.
    let mut collected = String::new();
    while let Some(fragment) = stream.next().await {
        let fragment = fragment.unwrap();
        assert!(!fragment.is_empty());
        collected.push_str(&fragment);
    }
    assert_eq!(collected, "Hello world!");
}

#[tokio::test]
async fn http_error_surfaces_as_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let client = OpenAiClient::with_base_url(HttpClient::new(), "bad-key", "gpt-4o", server.uri());

    let result = client.get_response(&Conversation::user_text("Hi")).await;
    match result {
        Err(DomainError::Provider { message, .. }) => {
            assert!(message.contains("401"), "message: {message}");
        }
        other => panic!("expected provider error, got {:?}", other),
    }
}
