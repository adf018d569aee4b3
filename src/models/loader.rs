//! Artifact loader for the classifier and the two scalers

use crate::error::ArtifactLoadError;
use crate::models::classifier::{ClassifierArtifact, FittedClassifier};
use crate::models::onnx::{OnnxClassifier, OnnxTransformer};
use crate::models::scaler::{FittedTransformer, ScalerArtifact, ScalerKind};
use crate::types::request::FEATURE_COUNT;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Resolved locations of the three artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub minmax_scaler: PathBuf,
    pub standard_scaler: PathBuf,
}

/// The three artifacts, loaded and checked.
pub struct LoadedArtifacts {
    pub classifier: Arc<dyn FittedClassifier>,
    pub minmax_scaler: Arc<dyn FittedTransformer>,
    pub standard_scaler: Arc<dyn FittedTransformer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArtifactFormat {
    Json,
    Onnx,
}

impl ArtifactFormat {
    fn of(path: &Path) -> Result<Self, ArtifactLoadError> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Ok(ArtifactFormat::Json),
            Some("onnx") => Ok(ArtifactFormat::Onnx),
            _ => Err(ArtifactLoadError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Loader for model and scaler artifacts
pub struct ArtifactLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ArtifactLoader {
    /// Create a new artifact loader with default settings (1 thread)
    pub fn new() -> Self {
        Self::with_threads(1)
    }

    /// Create a new artifact loader with the given ONNX thread count
    pub fn with_threads(onnx_threads: usize) -> Self {
        Self { onnx_threads }
    }

    /// Load a scaler artifact (`.json` or `.onnx`)
    ///
    /// JSON artifacts carry their kind and must match `expected`. ONNX graphs
    /// are opaque, so their kind is taken on trust.
    pub fn load_transformer(
        &self,
        path: &Path,
        name: &str,
        expected: ScalerKind,
    ) -> Result<Arc<dyn FittedTransformer>, ArtifactLoadError> {
        let transformer: Arc<dyn FittedTransformer> = match ArtifactFormat::of(path)? {
            ArtifactFormat::Json => {
                let artifact: ScalerArtifact = read_json(path)?;
                if artifact.kind() != expected {
                    return Err(invalid(
                        path,
                        format!("expected a {} scaler, found {}", expected, artifact.kind()),
                    ));
                }
                artifact.check().map_err(|reason| invalid(path, reason))?;
                Arc::from(artifact.into_transformer())
            }
            ArtifactFormat::Onnx => Arc::new(OnnxTransformer::load(path, name, self.onnx_threads)?),
        };

        expect_width(path, transformer.n_features())?;
        info!(
            artifact = %name,
            kind = %transformer.name(),
            path = %path.display(),
            "Scaler loaded"
        );
        Ok(transformer)
    }

    /// Load a classifier artifact (`.json` or `.onnx`)
    pub fn load_classifier(
        &self,
        path: &Path,
        name: &str,
    ) -> Result<Arc<dyn FittedClassifier>, ArtifactLoadError> {
        let classifier: Arc<dyn FittedClassifier> = match ArtifactFormat::of(path)? {
            ArtifactFormat::Json => {
                let artifact: ClassifierArtifact = read_json(path)?;
                artifact.check().map_err(|reason| invalid(path, reason))?;
                Arc::from(artifact.into_classifier())
            }
            ArtifactFormat::Onnx => Arc::new(OnnxClassifier::load(path, name, self.onnx_threads)?),
        };

        expect_width(path, classifier.n_features())?;
        info!(
            artifact = %name,
            kind = %classifier.name(),
            path = %path.display(),
            "Classifier loaded"
        );
        Ok(classifier)
    }

    /// Load all three artifacts; any single failure fails the whole load.
    pub fn load_all(&self, paths: &ArtifactPaths) -> Result<LoadedArtifacts, ArtifactLoadError> {
        let classifier = self.load_classifier(&paths.model, "model")?;
        let minmax_scaler =
            self.load_transformer(&paths.minmax_scaler, "minmax_scaler", ScalerKind::MinMax)?;
        let standard_scaler =
            self.load_transformer(&paths.standard_scaler, "standard_scaler", ScalerKind::Standard)?;

        info!(count = 3, "All artifacts loaded");

        Ok(LoadedArtifacts {
            classifier,
            minmax_scaler,
            standard_scaler,
        })
    }
}

impl Default for ArtifactLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid(path: &Path, reason: String) -> ArtifactLoadError {
    ArtifactLoadError::Invalid {
        path: path.to_path_buf(),
        reason,
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactLoadError> {
    if !path.exists() {
        return Err(ArtifactLoadError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = std::fs::read(path).map_err(|source| ArtifactLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_slice(&bytes).map_err(|source| ArtifactLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Artifacts of known width must be fitted on exactly the request features.
fn expect_width(path: &Path, width: Option<usize>) -> Result<(), ArtifactLoadError> {
    match width {
        Some(n) if n != FEATURE_COUNT => Err(invalid(
            path,
            format!("fitted on {} features, expected {}", n, FEATURE_COUNT),
        )),
        _ => Ok(()),
    }
}
