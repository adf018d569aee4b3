//! Error taxonomy for the crop recommendation service.

use crate::types::response::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal startup failure: an artifact could not be turned into a usable model or scaler.
#[derive(Debug, Error)]
pub enum ArtifactLoadError {
    #[error("artifact not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse artifact {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid artifact {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },

    #[error("unsupported artifact format for {} (expected .json or .onnx)", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("ONNX Runtime could not load {}: {message}", path.display())]
    Onnx { path: PathBuf, message: String },
}

/// A required request field is absent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing field: {0}")]
    MissingField(&'static str),
}

/// Anything that goes wrong between validation and a resolved crop label.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("request body is not valid JSON: {0}")]
    MalformedBody(String),

    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("could not convert {field} to float: {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    #[error("{stage} expected {expected} features, got {actual}")]
    ShapeMismatch {
        stage: String,
        expected: usize,
        actual: usize,
    },

    #[error("{0} is not loaded")]
    NotLoaded(&'static str),

    #[error("{stage} failed: {message}")]
    Inference { stage: String, message: String },

    #[error("classifier returned a non-finite class code ({0})")]
    InvalidClassCode(f64),
}

/// Errors surfaced at the HTTP boundary of `/predict`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Prediction(#[from] PredictionError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the `error` field of the response body.
    pub fn client_message(&self) -> String {
        match self {
            ApiError::Validation(e) => e.to_string(),
            ApiError::Prediction(e) => format!("Prediction failed: {}", e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ErrorResponse::new(self.client_message()))).into_response()
    }
}
