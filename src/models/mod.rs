//! Model and scaler artifacts, and the inference pipeline built on them

pub mod classifier;
pub mod inference;
pub mod loader;
pub mod onnx;
pub mod scaler;

pub use classifier::{FittedClassifier, LinearClassifier};
pub use inference::{CropPrediction, InferenceContext};
pub use loader::{ArtifactLoader, ArtifactPaths};
pub use scaler::{FittedTransformer, MinMaxScaler, ScalerKind, StandardScaler};
