//! Folio Server - HTTP proxy routes for the chat, code review and blog tools.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod state;

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use error::ApiError;
pub use state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = middleware::cors::build_cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(state))
}

async fn health_check() -> &'static str {
    "OK"
}
