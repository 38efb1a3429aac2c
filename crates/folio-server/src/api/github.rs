use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
};
use folio_core::models::{GithubRequest, GithubResponse};

use crate::{ApiError, AppState};

pub async fn fetch_file(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<GithubRequest>, JsonRejection>,
) -> Result<Json<GithubResponse>, ApiError> {
    let Json(req) = payload?;
    let code = state
        .github
        .fetch_file(&req.repo_url, &req.file_path, req.token.as_deref())
        .await?;
    Ok(Json(GithubResponse { code }))
}
