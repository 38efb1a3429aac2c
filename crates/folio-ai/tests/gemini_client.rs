//! Integration tests for the Gemini client against a fake provider

use folio_ai::{AiError, GeminiClient, GenerationRequest, LlmClient};
use futures::StreamExt;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn disable_system_proxy_for_tests() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        // Safety: set once for the process before any HTTP clients are built.
        unsafe {
            std::env::set_var("FOLIO_DISABLE_SYSTEM_PROXY", "1");
        }
    });
}

fn client_for(server: &MockServer) -> GeminiClient {
    disable_system_proxy_for_tests();
    GeminiClient::new(Some("test-key".to_string())).with_base_url(server.uri())
}

fn sse_event(text: &str) -> String {
    let payload = json!({
        "candidates": [{ "content": { "parts": [{ "text": text }], "role": "model" } }]
    });
    format!("data: {payload}\r\n\r\n")
}

#[tokio::test]
async fn test_stream_text_yields_fragments_in_order() {
    let server = MockServer::start().await;
    let body = ["Hello", ", ", "world"].map(sse_event).concat();

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:streamGenerateContent"))
        .and(query_param("alt", "sse"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "Say hi" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .expect(1)
        .mount(&server)
        .await;

    let stream = client_for(&server)
        .stream_text(GenerationRequest::new("models/gemini-2.5-flash", "Say hi"))
        .await
        .unwrap();
    let fragments: Vec<String> = stream.map(|item| item.unwrap()).collect().await;

    assert_eq!(fragments, vec!["Hello", ", ", "world"]);
    assert_eq!(fragments.concat(), "Hello, world");
}

#[tokio::test]
async fn test_stream_text_fails_on_malformed_event() {
    let server = MockServer::start().await;
    let body = format!(
        "{}data: {{\"candidates\": [\r\n\r\n{}",
        sse_event("Hello"),
        sse_event("never seen")
    );

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:streamGenerateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let items: Vec<_> = client_for(&server)
        .stream_text(GenerationRequest::new("gemini-2.5-flash", "Say hi"))
        .await
        .unwrap()
        .collect()
        .await;

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].as_ref().unwrap(), "Hello");
    assert!(matches!(items[1], Err(AiError::InvalidFormat(_))));
}

#[tokio::test]
async fn test_stream_text_reports_status_before_streaming() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/no-such-model:streamGenerateContent"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": 404, "message": "models/no-such-model is not found", "status": "NOT_FOUND" }
        })))
        .mount(&server)
        .await;

    let error = match client_for(&server)
        .stream_text(GenerationRequest::new("no-such-model", "hi"))
        .await
    {
        Ok(_) => panic!("expected provider error"),
        Err(error) => error,
    };

    assert_eq!(error.status_code(), 404);
    assert!(error.to_string().contains("is not found"));
    assert!(error.details().is_some());
}

#[tokio::test]
async fn test_missing_key_fails_without_calling_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    disable_system_proxy_for_tests();
    let client = GeminiClient::new(Some("   ".to_string())).with_base_url(server.uri());
    let error = client
        .generate(GenerationRequest::new("gemini-2.5-flash", "hi"))
        .await
        .unwrap_err();

    assert!(matches!(error, AiError::MissingApiKey));
}

#[tokio::test]
async fn test_list_models_filters_generation_capable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [
                {
                    "name": "models/gemini-2.5-flash",
                    "displayName": "Gemini 2.5 Flash",
                    "description": "Fast",
                    "inputTokenLimit": 1048576,
                    "outputTokenLimit": 65536,
                    "supportedGenerationMethods": ["generateContent", "countTokens"]
                },
                {
                    "name": "models/text-embedding-004",
                    "displayName": "Text Embedding 004",
                    "supportedGenerationMethods": ["embedContent"]
                }
            ]
        })))
        .mount(&server)
        .await;

    let models = client_for(&server).list_models().await.unwrap();

    assert_eq!(models.len(), 1);
    assert_eq!(models[0].name, "models/gemini-2.5-flash");
    assert_eq!(models[0].display_name, "Gemini 2.5 Flash");
    assert_eq!(models[0].input_token_limit, 1_048_576);
}

#[tokio::test]
async fn test_generate_sends_schema_and_returns_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .and(body_partial_json(json!({
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": " [] " }] } }]
        })))
        .mount(&server)
        .await;

    let text = client_for(&server)
        .generate(
            GenerationRequest::new("gemini-2.5-flash", "review")
                .with_temperature(0.2)
                .with_json_schema(json!({ "type": "ARRAY" })),
        )
        .await
        .unwrap();

    assert_eq!(text.trim(), "[]");
}
