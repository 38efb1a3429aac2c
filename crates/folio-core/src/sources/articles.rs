use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use super::SourceError;
use crate::models::Article;

pub const DEFAULT_ARTICLES_API_URL: &str = "https://dev.to/api";
pub const DEFAULT_PER_PAGE: u32 = 6;

/// Lists one author's published articles.
#[derive(Clone)]
pub struct ArticleClient {
    client: Client,
    base_url: String,
    username: String,
    per_page: u32,
}

impl ArticleClient {
    pub fn new(client: Client, username: impl Into<String>) -> Self {
        Self {
            client,
            base_url: DEFAULT_ARTICLES_API_URL.to_string(),
            username: username.into(),
            per_page: DEFAULT_PER_PAGE,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub async fn list(&self) -> Result<Vec<Article>, SourceError> {
        let per_page = self.per_page.to_string();
        let url = Url::parse_with_params(
            &format!("{}/articles", self.base_url),
            [
                ("username", self.username.as_str()),
                ("per_page", per_page.as_str()),
            ],
        )
        .map_err(|err| {
            warn!(error = %err, "Invalid articles URL");
            SourceError::Articles
        })?;
        debug!(username = %self.username, "Listing articles");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            warn!(status = response.status().as_u16(), "Article listing failed");
            return Err(SourceError::Articles);
        }

        response.json::<Vec<Article>>().await.map_err(|err| {
            warn!(error = %err, "Article listing returned an unexpected body");
            SourceError::Articles
        })
    }
}
