use axum::Json;
use folio_core::site::{self, SiteFeature};

pub async fn list_features() -> Json<Vec<SiteFeature>> {
    Json(site::features())
}
