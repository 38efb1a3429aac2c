use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode};
use folio_ai::AiError;
use folio_core::models::ModelDescriptor;

use crate::{ApiError, AppState};

pub async fn list_models(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<ModelDescriptor>>, ApiError> {
    match state.llm.list_models().await {
        Ok(models) => Ok(Json(models)),
        Err(err @ AiError::LlmHttp { .. }) => {
            tracing::error!(error = %err, "Error listing models");
            let status =
                StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let mut api_error = ApiError::new(status, "Failed to fetch models");
            if let Some(details) = err.details() {
                api_error = api_error.with_details(details.clone());
            }
            Err(api_error)
        }
        Err(err) => {
            tracing::error!(error = %err, "List models failed");
            Err(ApiError::internal(
                "Something went wrong while fetching models",
            ))
        }
    }
}
