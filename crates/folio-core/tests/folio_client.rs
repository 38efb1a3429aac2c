use folio_core::chat::ChatSession;
use folio_core::models::{GithubRequest, ReviewRequest, Severity};
use folio_core::{ClientError, FolioClient, TurnState};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("build http client")
}

#[tokio::test]
async fn test_chat_turn_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({ "message": "hi", "modelName": "gemini-2.5-flash" })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/plain; charset=utf-8")
                .set_body_string("# Title\n- item"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = FolioClient::with_client(http(), server.uri());
    let mut session = ChatSession::new(client).with_model("gemini-2.5-flash");

    session.begin_turn("hi").unwrap();
    let outcome = session.stream_response(|_| {}).await.unwrap();

    assert_eq!(outcome, TurnState::Complete);
    assert_eq!(session.transcript().last().unwrap().text, "# Title\n- item");
}

#[tokio::test]
async fn test_error_envelope_becomes_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/github"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "File not found. Please check the repository URL and file path. (Not Found)"
        })))
        .mount(&server)
        .await;

    let client = FolioClient::with_client(http(), server.uri());
    let err = client
        .fetch_github(&GithubRequest {
            repo_url: "https://github.com/octo/demo".into(),
            file_path: "missing.rs".into(),
            token: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert!(matches!(err, ClientError::Api { .. }));
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn test_review_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/review"))
        .and(body_json(json!({ "code": "eval(x)", "language": "javascript" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "line": 1,
            "severity": "Critical",
            "suggestion": "Avoid eval",
            "explanation": "eval runs arbitrary code."
        }])))
        .mount(&server)
        .await;

    let client = FolioClient::with_client(http(), server.uri());
    let findings = client
        .review(&ReviewRequest {
            code: "eval(x)".into(),
            language: "javascript".into(),
        })
        .await
        .unwrap();

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Critical);
}

#[tokio::test]
async fn test_health_reports_unreachable_server() {
    let client = FolioClient::with_client(http(), "http://127.0.0.1:9");
    assert!(!client.health().await);
}
