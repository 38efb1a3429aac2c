use reqwest::Response;
use serde_json::Value;

use crate::error::AiError;

// Truncate error body to prevent leaking large or sensitive responses.
const MAX_ERROR_BODY: usize = 512;

/// Convert a non-success provider response into an [`AiError::LlmHttp`].
///
/// Google-style error envelopes (`{"error": {"message": ...}}`) have their message
/// lifted out; the parsed body is kept as details for the caller.
pub async fn response_to_error(response: Response, provider: &str) -> AiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    error_from_body(provider, status, &body)
}

pub(crate) fn error_from_body(provider: &str, status: u16, body: &str) -> AiError {
    let details = serde_json::from_str::<Value>(body).ok();
    let message = details
        .as_ref()
        .and_then(extract_message)
        .unwrap_or_else(|| truncate(body));

    AiError::LlmHttp {
        provider: provider.to_string(),
        status,
        message,
        details,
    }
}

pub(crate) fn extract_message(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(|error| error.get("message").or(Some(error)))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn truncate(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }

    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated]", &body[..end])
}
