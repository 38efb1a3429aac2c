use std::io;
use std::sync::Arc;

use axum::{
    Json,
    body::Body,
    extract::{Extension, rejection::JsonRejection},
    http::header,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use folio_ai::GenerationRequest;
use folio_core::models::ChatRequest;
use futures::StreamExt;
use tracing::{debug, error, info};

use crate::{ApiError, AppState};

/// Relay one prompt to the provider and stream its reply back as plain text.
///
/// Errors before the first fragment come back as JSON with the provider's
/// status. After that the status line is gone, so a failure writes an
/// `[Error]: ...` marker and aborts the body.
pub async fn chat(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload?;
    let message = req.message.trim();
    if message.is_empty() {
        return Err(ApiError::bad_request("Message is required"));
    }

    let model = req
        .model_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| state.config.provider.default_model.clone());
    info!(model = %model, chars = message.len(), "Starting chat stream");

    let mut fragments = state
        .llm
        .stream_text(GenerationRequest::new(model.clone(), message))
        .await?;

    let body = async_stream::stream! {
        let mut forwarded = 0usize;
        while let Some(item) = fragments.next().await {
            match item {
                Ok(text) => {
                    forwarded += text.len();
                    yield Ok::<Bytes, io::Error>(Bytes::from(text));
                }
                Err(err) => {
                    error!(error = %err, model = %model, "Chat stream failed");
                    yield Ok(Bytes::from(format!("[Error]: {}", err)));
                    yield Err(io::Error::other(err.to_string()));
                    return;
                }
            }
        }
        debug!(model = %model, bytes = forwarded, "Chat stream finished");
    };

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(body),
    )
        .into_response())
}
