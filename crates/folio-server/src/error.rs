use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use folio_ai::AiError;
use folio_core::models::ErrorBody;
use folio_core::review::ReviewError;
use folio_core::sources::SourceError;
use serde_json::Value;

/// Error returned by every route as `{ error, details? }`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

fn status_from(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
            details: self.details,
        });
        (self.status, body).into_response()
    }
}

impl From<AiError> for ApiError {
    fn from(err: AiError) -> Self {
        tracing::error!(error = %err, "Provider error");
        let status = status_from(err.status_code());
        let message = match &err {
            AiError::LlmHttp { message, .. } => message.clone(),
            other => other.to_string(),
        };
        let details = err.details().cloned();
        Self {
            status,
            message,
            details,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected request body");
        Self::bad_request(rejection.body_text())
    }
}

impl From<SourceError> for ApiError {
    fn from(err: SourceError) -> Self {
        tracing::warn!(error = %err, "Source fetch failed");
        Self::new(status_from(err.status_code()), err.to_string())
    }
}

impl From<ReviewError> for ApiError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::MissingInput => Self::bad_request(ReviewError::MissingInput.to_string()),
            ReviewError::Parse(parse) => {
                tracing::error!(error = %parse, "Review output failed validation");
                Self::internal(format!(
                    "Failed to get review from Gemini. Details: {}",
                    parse
                ))
            }
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!(error = %err, "API error");
        Self::internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_status_is_mirrored() {
        let err: ApiError = AiError::LlmHttp {
            provider: "Gemini".into(),
            status: 404,
            message: "models/nope is not found".into(),
            details: Some(serde_json::json!({ "error": { "code": 404 } })),
        }
        .into();

        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "models/nope is not found");
        assert!(err.details.is_some());
    }

    #[test]
    fn test_missing_key_is_500() {
        let err: ApiError = AiError::MissingApiKey.into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "GEMINI_API_KEY environment variable not set.");
    }

    #[test]
    fn test_source_errors_keep_status() {
        let err: ApiError = SourceError::Forbidden("rate limited".into()).into();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert!(err.message.contains("rate limited"));
    }
}
