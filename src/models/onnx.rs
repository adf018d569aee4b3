//! ONNX Runtime backed transformers and classifiers

use crate::error::{ArtifactLoadError, PredictionError};
use crate::models::classifier::FittedClassifier;
use crate::models::scaler::{check_width, FittedTransformer};
use ort::session::{builder::GraphOptimizationLevel, Session, SessionOutputs};
use ort::value::Tensor;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use tracing::{debug, info};

static ORT_INIT: OnceLock<Result<(), String>> = OnceLock::new();

/// Initialize the ONNX Runtime environment once per process.
///
/// The outcome of the first attempt is kept, so a failed init fails every
/// later load the same way.
fn init_runtime() -> Result<(), String> {
    ORT_INIT
        .get_or_init(|| {
            ort::init()
                .with_name("crop-recommendation")
                .commit()
                .map(|_| info!("ONNX Runtime initialized"))
                .map_err(|e| e.to_string())
        })
        .clone()
}

/// ONNX session with its resolved input and output names.
///
/// `Session::run` needs exclusive access, so the session sits behind a mutex
/// and concurrent requests take turns.
pub struct OnnxSession {
    name: String,
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
    n_features: Option<usize>,
}

impl OnnxSession {
    /// Load an ONNX model from file
    pub fn load(path: &Path, name: &str, threads: usize) -> Result<Self, ArtifactLoadError> {
        if !path.exists() {
            return Err(ArtifactLoadError::NotFound {
                path: path.to_path_buf(),
            });
        }
        init_runtime().map_err(|message| ArtifactLoadError::Onnx {
            path: path.to_path_buf(),
            message: format!("failed to initialize ONNX Runtime: {}", message),
        })?;

        let onnx_err = |e: ort::Error| ArtifactLoadError::Onnx {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        info!(artifact = %name, path = %path.display(), threads = threads, "Loading ONNX model");

        let session = Session::builder()
            .map_err(onnx_err)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(onnx_err)?
            .with_intra_threads(threads.max(1))
            .map_err(onnx_err)?
            .commit_from_file(path)
            .map_err(onnx_err)?;

        let input = session.inputs.first().ok_or_else(|| ArtifactLoadError::Invalid {
            path: path.to_path_buf(),
            reason: "model declares no inputs".to_string(),
        })?;
        let input_name = input.name.clone();
        // [batch, features]; a symbolic or missing width stays unknown
        let n_features = input
            .input_type
            .tensor_shape()
            .and_then(|shape| shape.get(1).copied())
            .filter(|&dim| dim > 0)
            .map(|dim| dim as usize);

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| ArtifactLoadError::Invalid {
                path: path.to_path_buf(),
                reason: "model declares no outputs".to_string(),
            })?;

        info!(
            artifact = %name,
            input = %input_name,
            output = %output_name,
            n_features = ?n_features,
            "ONNX model loaded"
        );

        Ok(Self {
            name: name.to_string(),
            session: Mutex::new(session),
            input_name,
            output_name,
            n_features,
        })
    }

    /// Run the session on a single row and hand the outputs to `extract`.
    fn run_row<T>(
        &self,
        row: &[f64],
        extract: impl FnOnce(&SessionOutputs, &str) -> Result<T, String>,
    ) -> Result<T, PredictionError> {
        if let Some(expected) = self.n_features {
            check_width(&self.name, expected, row)?;
        }

        let inference_err = |message: String| PredictionError::Inference {
            stage: self.name.clone(),
            message,
        };

        // Prepare input tensor - shape [1, num_features]
        let shape = vec![1_i64, row.len() as i64];
        let data: Vec<f32> = row.iter().map(|&v| v as f32).collect();
        let input = Tensor::from_array((shape, data)).map_err(|e| inference_err(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| inference_err(format!("session lock poisoned: {}", e)))?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input])
            .map_err(|e| inference_err(e.to_string()))?;

        let extracted = extract(&outputs, &self.output_name);
        extracted.map_err(inference_err)
    }
}

/// Transformer exported to ONNX; reads the first output as a float tensor.
pub struct OnnxTransformer {
    inner: OnnxSession,
}

impl OnnxTransformer {
    pub fn load(path: &Path, name: &str, threads: usize) -> Result<Self, ArtifactLoadError> {
        Ok(Self {
            inner: OnnxSession::load(path, name, threads)?,
        })
    }
}

impl FittedTransformer for OnnxTransformer {
    fn name(&self) -> &str {
        &self.inner.name
    }

    fn n_features(&self) -> Option<usize> {
        self.inner.n_features
    }

    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, PredictionError> {
        let width = row.len();
        let transformed = self.inner.run_row(row, |outputs, output_name| {
            let output = outputs
                .get(output_name)
                .ok_or_else(|| format!("missing output {}", output_name))?;
            let (_, data) = output
                .try_extract_tensor::<f32>()
                .map_err(|e| e.to_string())?;
            Ok(data.iter().map(|&v| v as f64).collect::<Vec<f64>>())
        })?;

        check_width(self.name(), width, &transformed)?;
        debug!(artifact = %self.name(), "ONNX transform complete");
        Ok(transformed)
    }
}

/// Classifier exported to ONNX; reads the first output as the predicted label.
pub struct OnnxClassifier {
    inner: OnnxSession,
}

impl OnnxClassifier {
    pub fn load(path: &Path, name: &str, threads: usize) -> Result<Self, ArtifactLoadError> {
        Ok(Self {
            inner: OnnxSession::load(path, name, threads)?,
        })
    }
}

impl FittedClassifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.inner.name
    }

    fn n_features(&self) -> Option<usize> {
        self.inner.n_features
    }

    fn predict(&self, row: &[f64]) -> Result<f64, PredictionError> {
        self.inner.run_row(row, |outputs, output_name| {
            let output = outputs
                .get(output_name)
                .ok_or_else(|| format!("missing output {}", output_name))?;

            // Labels are int64 for integer classes; some exporters emit floats
            if let Ok((_, labels)) = output.try_extract_tensor::<i64>() {
                return labels
                    .first()
                    .map(|&label| label as f64)
                    .ok_or_else(|| "empty label tensor".to_string());
            }
            if let Ok((_, labels)) = output.try_extract_tensor::<f32>() {
                return labels
                    .first()
                    .map(|&label| label as f64)
                    .ok_or_else(|| "empty label tensor".to_string());
            }

            Err(format!(
                "output {} is not an int64 or float32 label tensor",
                output_name
            ))
        })
    }
}
