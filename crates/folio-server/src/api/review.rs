use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
};
use folio_ai::{AiError, GenerationRequest};
use folio_core::models::{ReviewRequest, ReviewSuggestion};
use folio_core::review::{self, REVIEW_TEMPERATURE};
use tracing::info;

use crate::{ApiError, AppState};

pub async fn review(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<Json<Vec<ReviewSuggestion>>, ApiError> {
    let Json(req) = payload?;
    review::validate_input(&req.code, &req.language)?;

    let model = state.config.provider.review_model.clone();
    info!(model = %model, language = %req.language, lines = req.code.lines().count(), "Reviewing code");

    let request = GenerationRequest::new(model, review::build_prompt(&req.code, &req.language))
        .with_temperature(REVIEW_TEMPERATURE)
        .with_json_schema(review::response_schema());

    let text = match state.llm.generate(request).await {
        Ok(text) => text,
        Err(AiError::MissingApiKey) => return Err(AiError::MissingApiKey.into()),
        Err(err) => {
            tracing::error!(error = %err, "Review generation failed");
            return Err(ApiError::internal(format!(
                "Failed to get review from Gemini. Details: {}",
                err
            )));
        }
    };

    let suggestions = review::parse_suggestions(&text)?;
    info!(findings = suggestions.len(), "Review complete");
    Ok(Json(suggestions))
}
