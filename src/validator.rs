//! Presence check for the seven required request fields.
//!
//! Only presence is checked here. Whether a value is actually numeric is
//! decided by the [`FeatureExtractor`](crate::feature_extractor::FeatureExtractor).

use crate::error::{ApiError, PredictionError, ValidationError};
use crate::types::request::FeatureField;
use serde_json::{Map, Value};

/// Checks that a request body carries every [`FeatureField`].
pub struct RequestValidator;

impl RequestValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a parsed JSON body and hand back its fields.
    ///
    /// An array has no named entries, so it fails on the first field like an
    /// empty object. Scalars and `null` cannot be checked at all and are
    /// reported as a [`PredictionError`].
    pub fn validate<'a>(&self, body: &'a Value) -> Result<&'a Map<String, Value>, ApiError> {
        let fields = match body {
            Value::Object(fields) => fields,
            Value::Array(_) => {
                return Err(ValidationError::MissingField(FeatureField::ALL[0].name()).into())
            }
            _ => return Err(PredictionError::NotAnObject.into()),
        };

        match Self::first_missing(fields) {
            Some(field) => Err(ValidationError::MissingField(field.name()).into()),
            None => Ok(fields),
        }
    }

    /// First absent field in column order. A present `null` counts as present.
    pub fn first_missing(fields: &Map<String, Value>) -> Option<FeatureField> {
        FeatureField::ALL
            .into_iter()
            .find(|field| !fields.contains_key(field.name()))
    }
}

impl Default for RequestValidator {
    fn default() -> Self {
        Self::new()
    }
}
