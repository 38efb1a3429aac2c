use std::sync::Arc;

use axum::{Json, extract::Extension};
use folio_core::models::Article;

use crate::{ApiError, AppState};

pub async fn list_articles(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<Article>>, ApiError> {
    Ok(Json(state.articles.list().await?))
}
