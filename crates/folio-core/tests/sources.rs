use folio_core::sources::{ArticleClient, GitHubClient, SourceError};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("build http client")
}

fn github(server: &MockServer) -> GitHubClient {
    GitHubClient::new(http()).with_base_url(server.uri())
}

#[tokio::test]
async fn test_fetch_file_decodes_wrapped_base64() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/demo/contents/src/main.rs"))
        .and(header("accept", "application/vnd.github.v3+json"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "file",
            "encoding": "base64",
            "content": "Zm4gbWFp\nbigpIHt9\nCg==\n"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let code = github(&server)
        .fetch_file("https://github.com/octo/demo.git", "src/main.rs", Some("secret"))
        .await
        .unwrap();

    assert_eq!(code, "fn main() {}\n");
}

#[tokio::test]
async fn test_upstream_statuses_map_to_messages() {
    let cases = [
        (404, 404, "File not found."),
        (401, 401, "Bad credentials."),
        (403, 403, "API rate limit exceeded"),
        (500, 500, "Server Error"),
    ];

    for (upstream, expected, prefix) in cases {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(upstream).set_body_json(json!({ "message": "Server Error" })),
            )
            .mount(&server)
            .await;

        let err = github(&server)
            .fetch_file("https://github.com/octo/demo", "README.md", None)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), expected);
        assert!(err.to_string().starts_with(prefix), "{err}");
        assert!(err.to_string().contains("Server Error"));
    }
}

#[tokio::test]
async fn test_directory_listing_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "lib.rs", "type": "file" }
        ])))
        .mount(&server)
        .await;

    let err = github(&server)
        .fetch_file("https://github.com/octo/demo", "src", None)
        .await
        .unwrap_err();

    assert!(matches!(err, SourceError::NotAFile));
    assert_eq!(err.status_code(), 500);
}

#[tokio::test]
async fn test_invalid_repo_url_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = github(&server);
    let err = client
        .fetch_file("https://example.com/octo/demo", "a.rs", None)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);

    let err = client
        .fetch_file("https://github.com/octo/demo", " ", None)
        .await
        .unwrap_err();
    assert!(matches!(err, SourceError::MissingInput));
}

#[tokio::test]
async fn test_list_articles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/articles"))
        .and(query_param("username", "someone"))
        .and(query_param("per_page", "6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 42,
            "title": "Streaming in Rust",
            "description": "Chunked bodies",
            "url": "https://dev.to/someone/streaming",
            "cover_image": null,
            "published_at": "2025-01-02T03:04:05Z",
            "reading_time_minutes": 4,
            "tag_list": ["rust", "http"],
            "comments_count": 3
        }])))
        .mount(&server)
        .await;

    let articles = ArticleClient::new(http(), "someone")
        .with_base_url(server.uri())
        .list()
        .await
        .unwrap();

    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].id, 42);
    assert_eq!(articles[0].tag_list, vec!["rust", "http"]);
    assert_eq!(articles[0].cover_image, None);
}

#[tokio::test]
async fn test_article_failure_is_generic() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = ArticleClient::new(http(), "someone")
        .with_base_url(server.uri())
        .list()
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Failed to fetch articles");
    assert_eq!(err.status_code(), 500);
}
