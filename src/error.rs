//! Error types for parsing, conversion and the HTTP layer.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Why a `STK_TRD` line was dropped. Never fatal to a conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("missing field {index} (line has {found} fields)")]
    MissingField { index: usize, found: usize },
    #[error("invalid date {0:?}, expected YYYYMMDD")]
    InvalidDate(String),
    #[error("invalid quantity {0:?}")]
    InvalidQuantity(String),
}

/// Failure that aborts a whole conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No file uploaded")]
    NoFile,
    #[error("Invalid file type. Please upload a {0} file")]
    InvalidFileType(String),
    #[error("upload failed: {0}")]
    Upload(#[from] MultipartError),
    #[error("conversion failed: {0}")]
    Conversion(#[from] ConvertError),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NoFile | ApiError::InvalidFileType(_) => StatusCode::BAD_REQUEST,
            // body limit hits and malformed multipart come back as 4xx
            ApiError::Upload(e) => e.status(),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::Conversion(ConvertError::Io(e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }
        let body = json!({ "success": false, "detail": self.to_string() });
        (status, Json(body)).into_response()
    }
}
