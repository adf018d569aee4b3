//! Request-side data structures: the seven soil/climate measurements.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of measurements the models are fitted on.
pub const FEATURE_COUNT: usize = 7;

/// One named input measurement.
///
/// Variant order is the column order the scalers and classifier were fitted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureField {
    Nitrogen,
    Phosphorus,
    Potassium,
    Temperature,
    Humidity,
    Ph,
    Rainfall,
}

impl FeatureField {
    /// All fields in model column order.
    pub const ALL: [FeatureField; FEATURE_COUNT] = [
        FeatureField::Nitrogen,
        FeatureField::Phosphorus,
        FeatureField::Potassium,
        FeatureField::Temperature,
        FeatureField::Humidity,
        FeatureField::Ph,
        FeatureField::Rainfall,
    ];

    /// Exact (case-sensitive) JSON key for this field.
    pub fn name(self) -> &'static str {
        match self {
            FeatureField::Nitrogen => "Nitrogen",
            FeatureField::Phosphorus => "Phosphorus",
            FeatureField::Potassium => "Potassium",
            FeatureField::Temperature => "Temperature",
            FeatureField::Humidity => "Humidity",
            FeatureField::Ph => "Ph",
            FeatureField::Rainfall => "Rainfall",
        }
    }

    /// Column index in the feature vector.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FeatureField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Seven finite measurements in model column order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Build from values already in column order.
    ///
    /// Callers coming from untrusted input go through
    /// [`FeatureExtractor`](crate::feature_extractor::FeatureExtractor), which
    /// checks finiteness.
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn get(&self, field: FeatureField) -> f64 {
        self.0[field.index()]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl From<&SoilSample> for FeatureVector {
    fn from(sample: &SoilSample) -> Self {
        Self([
            sample.nitrogen,
            sample.phosphorus,
            sample.potassium,
            sample.temperature,
            sample.humidity,
            sample.ph,
            sample.rainfall,
        ])
    }
}

/// Typed form of a `/predict` request body, used by clients and tests.
///
/// The server itself accepts untyped JSON so that missing and malformed
/// fields can be reported separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilSample {
    #[serde(rename = "Nitrogen")]
    pub nitrogen: f64,
    #[serde(rename = "Phosphorus")]
    pub phosphorus: f64,
    #[serde(rename = "Potassium")]
    pub potassium: f64,
    /// Degrees Celsius
    #[serde(rename = "Temperature")]
    pub temperature: f64,
    /// Relative humidity, percent
    #[serde(rename = "Humidity")]
    pub humidity: f64,
    #[serde(rename = "Ph")]
    pub ph: f64,
    /// Millimetres
    #[serde(rename = "Rainfall")]
    pub rainfall: f64,
}
