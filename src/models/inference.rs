//! Feature pipeline and the shared inference context

use crate::error::{ArtifactLoadError, PredictionError};
use crate::models::classifier::FittedClassifier;
use crate::models::loader::{ArtifactLoader, ArtifactPaths, LoadedArtifacts};
use crate::models::scaler::FittedTransformer;
use crate::types::crop::crop_name;
use crate::types::request::FeatureVector;
use std::sync::Arc;
use tracing::debug;

/// Result of a single prediction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropPrediction {
    /// Integer class code from the classifier
    pub class_code: i64,
    /// Resolved crop name ("Unknown Crop" for codes outside the table)
    pub crop: &'static str,
}

/// Process-wide, read-only inference state.
///
/// Built once at startup and shared by every request handler. Each artifact
/// slot is optional so that a degraded context can be represented; the
/// normal startup path either fills all three or fails.
pub struct InferenceContext {
    classifier: Option<Arc<dyn FittedClassifier>>,
    minmax_scaler: Option<Arc<dyn FittedTransformer>>,
    standard_scaler: Option<Arc<dyn FittedTransformer>>,
}

impl InferenceContext {
    /// Load all artifacts from disk. Any failure is fatal for the caller.
    pub fn load(paths: &ArtifactPaths, onnx_threads: usize) -> Result<Self, ArtifactLoadError> {
        let artifacts = ArtifactLoader::with_threads(onnx_threads).load_all(paths)?;
        Ok(Self::from(artifacts))
    }

    /// Create a context from already-constructed artifacts
    pub fn new(
        classifier: Arc<dyn FittedClassifier>,
        minmax_scaler: Arc<dyn FittedTransformer>,
        standard_scaler: Arc<dyn FittedTransformer>,
    ) -> Self {
        Self {
            classifier: Some(classifier),
            minmax_scaler: Some(minmax_scaler),
            standard_scaler: Some(standard_scaler),
        }
    }

    /// Create a context with any subset of artifacts present
    pub fn from_parts(
        classifier: Option<Arc<dyn FittedClassifier>>,
        minmax_scaler: Option<Arc<dyn FittedTransformer>>,
        standard_scaler: Option<Arc<dyn FittedTransformer>>,
    ) -> Self {
        Self {
            classifier,
            minmax_scaler,
            standard_scaler,
        }
    }

    pub fn model_loaded(&self) -> bool {
        self.classifier.is_some()
    }

    /// Both scalers are required for the scalers to count as loaded.
    pub fn scalers_loaded(&self) -> bool {
        self.minmax_scaler.is_some() && self.standard_scaler.is_some()
    }

    /// Apply min-max scaling, then standardization.
    ///
    /// The order is fixed: the standard scaler was fitted on min-max output.
    pub fn transform(&self, features: &FeatureVector) -> Result<Vec<f64>, PredictionError> {
        let minmax = self
            .minmax_scaler
            .as_ref()
            .ok_or(PredictionError::NotLoaded("min-max scaler"))?;
        let standard = self
            .standard_scaler
            .as_ref()
            .ok_or(PredictionError::NotLoaded("standard scaler"))?;

        let scaled = minmax.transform(features.as_slice())?;
        standard.transform(&scaled)
    }

    /// Run the classifier on transformed features and truncate to a class code.
    pub fn classify(&self, transformed: &[f64]) -> Result<i64, PredictionError> {
        let classifier = self
            .classifier
            .as_ref()
            .ok_or(PredictionError::NotLoaded("classifier"))?;

        let raw = classifier.predict(transformed)?;
        if !raw.is_finite() {
            return Err(PredictionError::InvalidClassCode(raw));
        }
        Ok(raw.trunc() as i64)
    }

    /// Full pipeline: scale, standardize, classify, resolve the label.
    pub fn predict(&self, features: &FeatureVector) -> Result<CropPrediction, PredictionError> {
        let transformed = self.transform(features)?;
        let class_code = self.classify(&transformed)?;
        let crop = crop_name(class_code);

        debug!(
            class_code = class_code,
            crop = %crop,
            transformed = ?transformed,
            "Prediction complete"
        );

        Ok(CropPrediction { class_code, crop })
    }
}

impl From<LoadedArtifacts> for InferenceContext {
    fn from(artifacts: LoadedArtifacts) -> Self {
        Self::new(
            artifacts.classifier,
            artifacts.minmax_scaler,
            artifacts.standard_scaler,
        )
    }
}
