//! Feature extraction for crop recommendation inference.
//!
//! Turns the raw values of a validated request into the fixed-order
//! [`FeatureVector`] the scalers and classifier were fitted on.

use crate::error::PredictionError;
use crate::types::request::{FeatureField, FeatureVector, FEATURE_COUNT};
use serde_json::{Map, Value};

/// Coerces request values into model input features.
///
/// Numbers are taken as is, numeric strings are parsed after trimming, and
/// booleans become 1.0 / 0.0. Anything else, or a value that is not finite,
/// is rejected.
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Create a new feature extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract features from a validated request body.
    ///
    /// Fields are read in [`FeatureField::ALL`] order; the first failing field
    /// determines the error.
    pub fn extract(&self, fields: &Map<String, Value>) -> Result<FeatureVector, PredictionError> {
        let mut values = [0.0; FEATURE_COUNT];

        for field in FeatureField::ALL {
            let raw = fields.get(field.name()).unwrap_or(&Value::Null);
            values[field.index()] = Self::coerce(field, raw)?;
        }

        Ok(FeatureVector::new(values))
    }

    /// Convert a single JSON value to a finite float.
    pub fn coerce(field: FeatureField, raw: &Value) -> Result<f64, PredictionError> {
        let value = match raw {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        };

        let value = value.ok_or_else(|| PredictionError::InvalidValue {
            field: field.name(),
            value: raw.to_string(),
        })?;

        if !value.is_finite() {
            return Err(PredictionError::NonFinite {
                field: field.name(),
            });
        }

        Ok(value)
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}
