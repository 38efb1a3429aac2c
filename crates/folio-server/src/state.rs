use std::sync::Arc;

use folio_ai::{GeminiClient, LlmClient, build_http_client};
use folio_core::sources::{ArticleClient, GitHubClient};

use crate::config::ServerConfig;

/// Shared, read-only state handed to every handler.
pub struct AppState {
    pub llm: Arc<dyn LlmClient>,
    pub github: GitHubClient,
    pub articles: ArticleClient,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig, llm: Arc<dyn LlmClient>) -> Self {
        let http = build_http_client();
        let github =
            GitHubClient::new(http.clone()).with_base_url(config.sources.github_api_url.clone());
        let articles = ArticleClient::new(http, config.sources.articles_username.clone())
            .with_base_url(config.sources.articles_api_url.clone())
            .with_per_page(config.sources.articles_per_page);

        Self {
            llm,
            github,
            articles,
            config,
        }
    }

    /// Build state backed by the hosted Gemini API.
    pub fn from_config(config: ServerConfig) -> Self {
        let mut gemini = GeminiClient::new(config.provider.api_key.clone());
        if let Some(base_url) = config.provider.base_url.as_deref() {
            gemini = gemini.with_base_url(base_url);
        }
        Self::new(config, Arc::new(gemini))
    }
}
