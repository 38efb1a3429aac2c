use folio_core::sources::{DEFAULT_ARTICLES_API_URL, DEFAULT_GITHUB_API_URL, DEFAULT_PER_PAGE};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG_FILE: &str = "folio.toml";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_ARTICLES_USERNAME: &str = "david_emmanuelg";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub provider: ProviderConfig,
    pub sources: SourcesConfig,
    /// Empty or containing `*` allows any origin
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    /// Overrides the public Gemini endpoint
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_model")]
    pub default_model: String,
    #[serde(default = "default_model")]
    pub review_model: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            default_model: default_model(),
            review_model: default_model(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,
    #[serde(default = "default_articles_api_url")]
    pub articles_api_url: String,
    #[serde(default = "default_articles_username")]
    pub articles_username: String,
    #[serde(default = "default_articles_per_page")]
    pub articles_per_page: u32,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            github_api_url: default_github_api_url(),
            articles_api_url: default_articles_api_url(),
            articles_username: default_articles_username(),
            articles_per_page: default_articles_per_page(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    #[serde(default)]
    server: ServerSection,
    #[serde(default)]
    provider: ProviderConfig,
    #[serde(default)]
    sources: SourcesConfig,
    #[serde(default)]
    cors: CorsSection,
}

#[derive(Debug, Deserialize)]
struct ServerSection {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct CorsSection {
    #[serde(default)]
    origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_github_api_url() -> String {
    DEFAULT_GITHUB_API_URL.to_string()
}

fn default_articles_api_url() -> String {
    DEFAULT_ARTICLES_API_URL.to_string()
}

fn default_articles_username() -> String {
    DEFAULT_ARTICLES_USERNAME.to_string()
}

fn default_articles_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            provider: ProviderConfig::default(),
            sources: SourcesConfig::default(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Load from `FOLIO_SERVER_CONFIG` or `./folio.toml`, falling back to the environment.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match config_file_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::from_env(),
        };

        if config.provider.api_key.is_none() {
            config.provider.api_key = non_empty_var("GEMINI_API_KEY");
        }
        Ok(config)
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|err| anyhow::anyhow!("Failed to read config {}: {}", path, err))?;
        let parsed: FileConfig = toml::from_str(&contents)
            .map_err(|err| anyhow::anyhow!("Failed to parse config {}: {}", path, err))?;

        Ok(Self {
            host: parsed.server.host,
            port: parsed.server.port,
            provider: parsed.provider,
            sources: parsed.sources,
            cors_origins: parsed.cors.origins,
        })
    }

    fn from_env() -> Self {
        let defaults = Self::default();
        let host = env::var("FOLIO_SERVER_HOST").unwrap_or(defaults.host);
        let port = env::var("FOLIO_SERVER_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(defaults.port);

        let provider = ProviderConfig {
            api_key: non_empty_var("GEMINI_API_KEY"),
            base_url: non_empty_var("GEMINI_BASE_URL"),
            default_model: non_empty_var("FOLIO_DEFAULT_MODEL")
                .unwrap_or(defaults.provider.default_model),
            review_model: non_empty_var("FOLIO_REVIEW_MODEL")
                .unwrap_or(defaults.provider.review_model),
        };

        let mut sources = defaults.sources;
        if let Some(username) = non_empty_var("FOLIO_ARTICLES_USERNAME") {
            sources.articles_username = username;
        }

        let cors_origins = env::var("FOLIO_CORS_ORIGINS")
            .map(|value| parse_origins(&value))
            .unwrap_or_default();

        Self {
            host,
            port,
            provider,
            sources,
            cors_origins,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn config_file_path() -> Option<String> {
    if let Ok(path) = env::var("FOLIO_SERVER_CONFIG") {
        return Some(path);
    }
    Path::new(DEFAULT_CONFIG_FILE)
        .exists()
        .then(|| DEFAULT_CONFIG_FILE.to_string())
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
