//! Prediction endpoint

use axum::{body::Bytes, extract::State, Json};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, error, warn};

use crate::error::{ApiError, PredictionError};
use crate::feature_extractor::FeatureExtractor;
use crate::models::inference::{CropPrediction, InferenceContext};
use crate::state::SharedState;
use crate::types::response::PredictionResponse;
use crate::validator::RequestValidator;

/// POST /predict - Recommend a crop from seven soil/climate measurements
///
/// The body is taken as raw bytes so that malformed JSON is reported in the
/// service's own error shape rather than the extractor's.
pub async fn predict(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<PredictionResponse>, ApiError> {
    let start = Instant::now();

    match run_prediction(&state.context, &body) {
        Ok(prediction) => {
            let elapsed = start.elapsed();
            state.metrics.record_prediction(prediction.crop, elapsed);
            debug!(
                class_code = prediction.class_code,
                crop = %prediction.crop,
                latency_us = elapsed.as_micros(),
                "Prediction served"
            );
            Ok(Json(PredictionResponse::new(
                prediction.class_code,
                prediction.crop,
            )))
        }
        Err(err @ ApiError::Validation(_)) => {
            state.metrics.record_validation_failure();
            warn!(error = %err, "Rejected prediction request");
            Err(err)
        }
        Err(err @ ApiError::Prediction(_)) => {
            state.metrics.record_prediction_failure();
            error!(error = ?err, "Prediction error: {}", err);
            Err(err)
        }
    }
}

/// Parse, validate, extract and predict. Validation runs before any computation.
pub fn run_prediction(context: &InferenceContext, body: &[u8]) -> Result<CropPrediction, ApiError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| PredictionError::MalformedBody(e.to_string()))?;

    let fields = RequestValidator::new().validate(&value)?;

    let features = FeatureExtractor::new().extract(fields)?;
    Ok(context.predict(&features)?)
}
