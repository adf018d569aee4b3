//! Type definitions for the crop recommendation service

pub mod crop;
pub mod request;
pub mod response;

pub use crop::{crop_name, UNKNOWN_CROP};
pub use request::{FeatureField, FeatureVector, SoilSample, FEATURE_COUNT};
pub use response::{ErrorResponse, HealthResponse, PredictionResponse, ServiceStatus};
