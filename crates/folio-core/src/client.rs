//! HTTP client for the Folio server API, used by the terminal front-end.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::chat::{ByteStream, ChatTransport};
use crate::models::{
    Article, ChatRequest, ErrorBody, GithubRequest, GithubResponse, ModelDescriptor,
    ReviewRequest, ReviewSuggestion,
};
use crate::site::SiteFeature;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Error envelope returned by the server
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            Self::Decode(_) => None,
        }
    }
}

#[derive(Clone)]
pub struct FolioClient {
    http: Client,
    base_url: String,
}

impl FolioClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(folio_ai::build_http_client(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> bool {
        self.http
            .get(self.url("/health"))
            .send()
            .await
            .map(|resp| resp.status().is_success())
            .unwrap_or(false)
    }

    pub async fn list_models(&self) -> Result<Vec<ModelDescriptor>, ClientError> {
        self.get_json("/api/models").await
    }

    pub async fn review(
        &self,
        request: &ReviewRequest,
    ) -> Result<Vec<ReviewSuggestion>, ClientError> {
        self.post_json("/api/review", request).await
    }

    pub async fn fetch_github(&self, request: &GithubRequest) -> Result<String, ClientError> {
        let response: GithubResponse = self.post_json("/api/github", request).await?;
        Ok(response.code)
    }

    pub async fn articles(&self) -> Result<Vec<Article>, ClientError> {
        self.get_json("/api/articles").await
    }

    pub async fn site(&self) -> Result<Vec<SiteFeature>, ClientError> {
        self.get_json("/api/site").await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ClientError> {
        debug!(path, "GET");
        let response = self.http.get(self.url(path)).send().await?;
        decode(check(response).await?).await
    }

    async fn post_json<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ClientError> {
        debug!(path, "POST");
        let response = self.http.post(self.url(path)).json(body).send().await?;
        decode(check(response).await?).await
    }
}

#[async_trait]
impl ChatTransport for FolioClient {
    async fn open(&self, message: &str, model: &str) -> Result<ByteStream, ClientError> {
        let request = ChatRequest {
            message: message.to_string(),
            model_name: Some(model.to_string()),
        };
        let response = self
            .http
            .post(self.url("/api/chat"))
            .json(&request)
            .send()
            .await?;
        let response = check(response).await?;

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(ClientError::from))
            .boxed())
    }
}

/// Turn a non-2xx response into [`ClientError::Api`] using the server's error envelope.
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or_else(|_| {
            if text.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            } else {
                text
            }
        });

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn decode<R: DeserializeOwned>(response: Response) -> Result<R, ClientError> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|err| ClientError::Decode(err.to_string()))
}
