use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::SourceError;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

static REPO_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"github\.com/([^/]+/[^/]+)").expect("valid repo regex"));

/// Extract `owner/repo` from a repository URL, dropping a trailing `.git`.
pub fn parse_repo_path(repo_url: &str) -> Option<String> {
    let captures = REPO_PATTERN.captures(repo_url)?;
    let path = captures.get(1)?.as_str();
    Some(path.strip_suffix(".git").unwrap_or(path).to_string())
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    #[serde(default)]
    content: Option<String>,
}

/// Reads single files through the repository contents API.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: String,
}

impl GitHubClient {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_GITHUB_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Fetch `file_path` from `repo_url` and return its decoded text.
    pub async fn fetch_file(
        &self,
        repo_url: &str,
        file_path: &str,
        token: Option<&str>,
    ) -> Result<String, SourceError> {
        if repo_url.trim().is_empty() || file_path.trim().is_empty() {
            return Err(SourceError::MissingInput);
        }
        let repo_path = parse_repo_path(repo_url).ok_or(SourceError::InvalidRepoUrl)?;
        let url = format!(
            "{}/repos/{}/contents/{}",
            self.base_url,
            repo_path,
            file_path.trim_start_matches('/')
        );
        debug!(repo = %repo_path, path = %file_path, "Fetching repository file");

        let mut request = self
            .client
            .get(&url)
            .header(ACCEPT, "application/vnd.github.v3+json");
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token.trim()));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Failed to fetch file. Status: {}", status.as_u16()));
            warn!(status = status.as_u16(), repo = %repo_path, "Repository file fetch failed");

            return Err(match status.as_u16() {
                404 => SourceError::NotFound(message),
                401 => SourceError::BadCredentials(message),
                403 => SourceError::Forbidden(message),
                other => SourceError::Upstream {
                    status: other,
                    message,
                },
            });
        }

        // Directories come back as a JSON array.
        let body: Value = response.json().await?;
        let contents: ContentsResponse =
            serde_json::from_value(body).map_err(|_| SourceError::NotAFile)?;
        let encoded = contents
            .content
            .filter(|c| !c.is_empty())
            .ok_or(SourceError::NotAFile)?;

        decode_content(&encoded)
    }
}

/// The contents API wraps base64 at 60 columns.
fn decode_content(encoded: &str) -> Result<String, SourceError> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|_| SourceError::Decode)?;
    String::from_utf8(bytes).map_err(|_| SourceError::Decode)
}
