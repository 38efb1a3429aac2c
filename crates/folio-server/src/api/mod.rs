pub mod articles;
pub mod chat;
pub mod github;
pub mod models;
pub mod review;
pub mod site;

use axum::{
    Router,
    routing::{get, post},
};

pub fn router() -> Router {
    Router::new()
        .route("/chat", post(chat::chat))
        .route("/models", get(models::list_models))
        .route("/review", post(review::review))
        .route("/github", post(github::fetch_file))
        .route("/articles", get(articles::list_articles))
        .route("/site", get(site::list_features))
}
