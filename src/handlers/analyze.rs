//! Analyze endpoint: multipart upload in, analysis + quote out.
//!
//! The multipart layer only extracts `(filename, byte_size)` and the form
//! parameters; everything below [`run_analysis`] is pure and synchronous.

use arc_swap::ArcSwap;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::analysis::{AnalysisResult, ShapeEstimator};
use crate::config::Config;
use crate::error::AppError;
use crate::metrics;
use crate::pricing::models::{PrintParameters, QuoteResult, SupportPreference};
use crate::pricing::QuoteCalculator;
use crate::quotes::QuoteStore;

/// Shared state for the API handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ArcSwap<Config>>,
    pub estimator: Arc<dyn ShapeEstimator>,
    pub quotes: Arc<QuoteStore>,
}

/// What the core needs to know about one analyze request, after the
/// multipart plumbing is done with it.
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub filename: String,
    pub byte_size: u64,
    pub material: Option<String>,
    pub infill_percent: Option<f64>,
    pub layer_height_mm: Option<f64>,
    pub supports: SupportPreference,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub filename: String,
    pub file_size_bytes: u64,
    pub analysis: AnalysisResult,
    pub pricing: QuoteResult,
    pub status: String,
}

/// POST /api/analyze - analyze an uploaded model file and price it
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let started = Instant::now();
    let cfg = state.config.load_full();

    let result = analyze_upload(&cfg, state.estimator.as_ref(), multipart).await;

    match &result {
        Ok(response) => {
            metrics::record_upload_size(response.file_size_bytes);
            metrics::record_quote(
                &response.pricing.material.key,
                response.pricing.parameters.includes_supports,
            );
            metrics::record_quote_duration(started.elapsed());
            info!(
                filename = %response.filename,
                bytes = response.file_size_bytes,
                total = response.pricing.costs.total,
                "Quote computed"
            );
        }
        Err(err) => {
            metrics::record_rejection(err.kind());
            warn!(error = %err, "Analyze request rejected");
        }
    }

    result.map(Json)
}

/// Drain the multipart stream into an [`AnalyzeRequest`] and run it.
///
/// The uploaded bytes are counted and discarded; no file content is ever
/// inspected or stored.
async fn analyze_upload(
    cfg: &Config,
    estimator: &dyn ShapeEstimator,
    mut multipart: Multipart,
) -> Result<AnalyzeResponse, AppError> {
    let mut upload: Option<(String, u64)> = None;
    let mut material: Option<String> = None;
    let mut infill: Option<f64> = None;
    let mut layer_height: Option<f64> = None;
    let mut include_supports: Option<bool> = None;

    while let Some(mut field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        match name.as_str() {
            "file" => {
                let filename = field
                    .file_name()
                    .ok_or_else(|| {
                        AppError::UploadError("file field carries no filename".to_string())
                    })?
                    .to_string();
                // Reject unsupported extensions before draining the body.
                validate_extension(&filename, &cfg.upload.allowed_extensions)?;

                let mut size: u64 = 0;
                while let Some(chunk) = field.chunk().await? {
                    size += chunk.len() as u64;
                }
                upload = Some((filename, size));
            }
            "material" => material = Some(field.text().await?),
            "infill" => infill = Some(parse_f64_field("infill", &field.text().await?)?),
            "layer_height" => {
                layer_height = Some(parse_f64_field("layer_height", &field.text().await?)?)
            }
            "include_supports" => {
                include_supports =
                    Some(parse_bool_field("include_supports", &field.text().await?)?)
            }
            _ => {}
        }
    }

    let (filename, byte_size) =
        upload.ok_or_else(|| AppError::UploadError("missing file field".to_string()))?;

    let request = AnalyzeRequest {
        filename,
        byte_size,
        material,
        infill_percent: infill,
        layer_height_mm: layer_height,
        supports: SupportPreference::from(include_supports),
    };

    run_analysis(cfg, estimator, &request)
}

/// Analyze and price one request. Pure over the config snapshot; this is
/// the entry point the integration tests exercise directly.
pub fn run_analysis(
    cfg: &Config,
    estimator: &dyn ShapeEstimator,
    request: &AnalyzeRequest,
) -> Result<AnalyzeResponse, AppError> {
    validate_extension(&request.filename, &cfg.upload.allowed_extensions)?;

    let analysis = estimator.estimate(request.byte_size);

    let material = request
        .material
        .as_deref()
        .unwrap_or(&cfg.upload.default_material);
    let params = PrintParameters {
        infill_percent: request
            .infill_percent
            .unwrap_or(cfg.upload.default_infill_percent),
        layer_height_mm: request
            .layer_height_mm
            .unwrap_or(cfg.upload.default_layer_height_mm),
        supports: request.supports,
    };

    let calculator = QuoteCalculator::new(&cfg.materials, &cfg.pricing);
    let pricing = calculator.quote(&analysis, material, &params)?;

    Ok(AnalyzeResponse {
        filename: request.filename.clone(),
        file_size_bytes: request.byte_size,
        analysis,
        pricing,
        status: "success".to_string(),
    })
}

/// Check a filename against the configured extension allow-list.
pub fn validate_extension(filename: &str, allowed: &[String]) -> Result<(), AppError> {
    match file_extension(filename) {
        Some(ext) if allowed.iter().any(|a| *a == ext) => Ok(()),
        _ => Err(AppError::UnsupportedFileType(format!(
            "'{}' (allowed: {})",
            filename,
            allowed.join(", ")
        ))),
    }
}

fn file_extension(filename: &str) -> Option<String> {
    let lower = filename.to_lowercase();
    std::path::Path::new(&lower)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
}

fn parse_f64_field(name: &str, raw: &str) -> Result<f64, AppError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| AppError::UploadError(format!("field '{}' is not a number: '{}'", name, raw)))
}

fn parse_bool_field(name: &str, raw: &str) -> Result<bool, AppError> {
    match raw.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(AppError::UploadError(format!(
            "field '{}' is not a boolean: '{}'",
            name, other
        ))),
    }
}
