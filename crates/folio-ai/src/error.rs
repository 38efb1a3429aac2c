//! Error types for the AI module

use serde_json::Value;
use thiserror::Error;

/// AI module error types
#[derive(Error, Debug)]
pub enum AiError {
    #[error("GEMINI_API_KEY environment variable not set.")]
    MissingApiKey,

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("{provider} request failed ({status}): {message}")]
    LlmHttp {
        provider: String,
        status: u16,
        message: String,
        details: Option<Value>,
    },

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AiError {
    /// HTTP status to report to callers, mirroring the provider when it gave one.
    pub fn status_code(&self) -> u16 {
        match self {
            AiError::LlmHttp { status, .. } if (400..600).contains(status) => *status,
            _ => 500,
        }
    }

    /// Structured error body returned by the provider, if any.
    pub fn details(&self) -> Option<&Value> {
        match self {
            AiError::LlmHttp { details, .. } => details.as_ref(),
            _ => None,
        }
    }
}

/// Result type alias for AI operations
pub type Result<T> = std::result::Result<T, AiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mirrors_provider() {
        let error = AiError::LlmHttp {
            provider: "Gemini".to_string(),
            status: 403,
            message: "forbidden".to_string(),
            details: None,
        };
        assert_eq!(error.status_code(), 403);
    }

    #[test]
    fn test_status_code_defaults_to_500() {
        assert_eq!(AiError::MissingApiKey.status_code(), 500);
        assert_eq!(AiError::Llm("boom".to_string()).status_code(), 500);

        let nonsense = AiError::LlmHttp {
            provider: "Gemini".to_string(),
            status: 200,
            message: "ok?".to_string(),
            details: None,
        };
        assert_eq!(nonsense.status_code(), 500);
    }
}
