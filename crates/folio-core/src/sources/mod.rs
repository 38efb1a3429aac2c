//! Third-party content sources: repository files and blog articles.

mod articles;
mod github;

pub use articles::{ArticleClient, DEFAULT_ARTICLES_API_URL, DEFAULT_PER_PAGE};
pub use github::{DEFAULT_GITHUB_API_URL, GitHubClient, parse_repo_path};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Repository URL and File Path are required.")]
    MissingInput,

    #[error("Invalid GitHub repository URL. Expected format: https://github.com/owner/repo")]
    InvalidRepoUrl,

    #[error("File not found. Please check the repository URL and file path. ({0})")]
    NotFound(String),

    #[error("Bad credentials. Please check your Personal Access Token. ({0})")]
    BadCredentials(String),

    #[error(
        "API rate limit exceeded or private repo access denied. Please add a Personal Access Token with repo access. ({0})"
    )]
    Forbidden(String),

    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("The fetched path appears to be a directory or does not contain content.")]
    NotAFile,

    #[error("Failed to decode file content from Base64.")]
    Decode,

    #[error("Failed to fetch articles")]
    Articles,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl SourceError {
    /// HTTP status the proxy route should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingInput | Self::InvalidRepoUrl => 400,
            Self::NotFound(_) => 404,
            Self::BadCredentials(_) => 401,
            Self::Forbidden(_) => 403,
            _ => 500,
        }
    }
}
