use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

use crate::pricing::models::QuoteError;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Uploaded file extension is not in the allow-list
    UnsupportedFileType(String),
    /// Material key absent from the catalog
    UnknownMaterial(String),
    /// Print parameter outside its valid range
    InvalidParameter(String),
    /// Malformed or incomplete multipart upload
    UploadError(String),
    /// Quote id not present in the store
    QuoteNotFound(String),
    /// Configuration error
    ConfigError(String),
    /// Internal server error
    InternalError(String),
}

impl AppError {
    /// Stable machine-readable tag, used in responses and rejection metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedFileType(_) => "unsupported_file_type",
            Self::UnknownMaterial(_) => "unknown_material",
            Self::InvalidParameter(_) => "invalid_parameter",
            Self::UploadError(_) => "upload_error",
            Self::QuoteNotFound(_) => "quote_not_found",
            Self::ConfigError(_) => "config_error",
            Self::InternalError(_) => "internal_error",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFileType(msg) => write!(f, "Unsupported file type: {}", msg),
            Self::UnknownMaterial(msg) => write!(f, "Unknown material: {}", msg),
            Self::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            Self::UploadError(msg) => write!(f, "Upload error: {}", msg),
            Self::QuoteNotFound(msg) => write!(f, "Quote not found: {}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            Self::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::UnsupportedFileType(_)
            | Self::UnknownMaterial(_)
            | Self::InvalidParameter(_)
            | Self::UploadError(_) => StatusCode::BAD_REQUEST,
            Self::QuoteNotFound(_) => StatusCode::NOT_FOUND,
            Self::ConfigError(_) | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": {
                "message": self.to_string(),
                "type": self.kind(),
            }
        }));

        (status, body).into_response()
    }
}

impl From<QuoteError> for AppError {
    fn from(err: QuoteError) -> Self {
        match err {
            QuoteError::UnknownMaterial(key) => Self::UnknownMaterial(key),
            QuoteError::InvalidParameter(msg) => Self::InvalidParameter(msg),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        Self::UploadError(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = AppError::UnknownMaterial("NYLON".to_string());
        assert_eq!(error.to_string(), "Unknown material: NYLON");
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            AppError::UnsupportedFileType(".exe".to_string()).kind(),
            "unsupported_file_type"
        );
        assert_eq!(
            AppError::QuoteNotFound("abc".to_string()).kind(),
            "quote_not_found"
        );
    }

    #[test]
    fn test_quote_error_conversion() {
        let err: AppError = QuoteError::UnknownMaterial("NYLON".to_string()).into();
        assert!(matches!(err, AppError::UnknownMaterial(_)));

        let err: AppError = QuoteError::InvalidParameter("layer_height_mm must be > 0".to_string()).into();
        assert!(matches!(err, AppError::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn test_bad_request_response() {
        let error = AppError::InvalidParameter("infill_percent must be between 0 and 100".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_not_found_response() {
        let error = AppError::QuoteNotFound("0000".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
