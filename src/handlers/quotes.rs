//! Quote store endpoints.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::AnalysisResult;
use crate::error::AppError;
use crate::handlers::analyze::AppState;
use crate::pricing::models::QuoteResult;
use crate::quotes::StoredQuote;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateQuoteRequest {
    #[serde(default)]
    pub filename: Option<String>,
    pub analysis: AnalysisResult,
    pub pricing: QuoteResult,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateQuoteResponse {
    pub quote_id: Uuid,
    pub status: String,
}

/// POST /api/quote - keep a computed quote for later retrieval
pub async fn create_quote(
    State(state): State<AppState>,
    Json(payload): Json<CreateQuoteRequest>,
) -> Result<Json<CreateQuoteResponse>, AppError> {
    let quote_id = state
        .quotes
        .insert(payload.filename, payload.analysis, payload.pricing);

    info!(quote_id = %quote_id, "Quote stored");

    Ok(Json(CreateQuoteResponse {
        quote_id,
        status: "created".to_string(),
    }))
}

/// GET /api/quote/:id - fetch a stored quote
pub async fn get_quote(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoredQuote>, AppError> {
    let quote_id =
        Uuid::parse_str(&id).map_err(|_| AppError::QuoteNotFound(id.clone()))?;

    state
        .quotes
        .get(&quote_id)
        .map(Json)
        .ok_or_else(|| AppError::QuoteNotFound(id))
}
