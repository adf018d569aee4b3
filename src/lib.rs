//! Crop Recommendation Service Library
//!
//! Serves a pre-trained crop classifier over HTTP: seven soil and climate
//! measurements go in, min-max scaling and standardization are applied, and
//! the predicted crop comes out.

pub mod config;
pub mod error;
pub mod feature_extractor;
pub mod metrics;
pub mod models;
pub mod routes;
pub mod server;
pub mod state;
pub mod types;
pub mod validator;

pub use config::AppConfig;
pub use error::{ApiError, ArtifactLoadError, PredictionError, ValidationError};
pub use feature_extractor::FeatureExtractor;
pub use metrics::ServiceMetrics;
pub use models::inference::InferenceContext;
pub use server::build_router;
pub use state::{AppState, SharedState};
pub use types::{crop_name, FeatureField, FeatureVector, SoilSample};
pub use validator::RequestValidator;
