use axum::{extract::State, Json};

use crate::handlers::analyze::AppState;
use crate::pricing::models::MaterialCatalog;

/// GET /api/materials - the material catalog, verbatim, for client display
pub async fn list_materials(State(state): State<AppState>) -> Json<MaterialCatalog> {
    Json(state.config.load().materials.clone())
}
