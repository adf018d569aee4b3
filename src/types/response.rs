//! Response payloads returned by the HTTP surface.

use serde::{Deserialize, Serialize};

/// Successful `/predict` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Integer class code produced by the classifier
    pub prediction: i64,
    /// Human-readable crop name, or "Unknown Crop"
    pub crop: String,
    pub status: String,
}

impl PredictionResponse {
    pub fn new(prediction: i64, crop: impl Into<String>) -> Self {
        Self {
            prediction,
            crop: crop.into(),
            status: "success".to_string(),
        }
    }
}

/// Error body shared by the 400 and 500 responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status: "error".to_string(),
        }
    }
}

/// Load state of an artifact group as reported by `/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Loaded,
    Error,
}

impl ServiceStatus {
    pub fn from_loaded(loaded: bool) -> Self {
        if loaded {
            ServiceStatus::Loaded
        } else {
            ServiceStatus::Error
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicesStatus {
    pub ml_model: ServiceStatus,
    pub scalers: ServiceStatus,
}

/// `/health` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: ServicesStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_response_shape() {
        let json = serde_json::to_value(PredictionResponse::new(1, "Rice")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"prediction": 1, "crop": "Rice", "status": "success"})
        );
    }

    #[test]
    fn test_service_status_serializes_lowercase() {
        let services = ServicesStatus {
            ml_model: ServiceStatus::from_loaded(true),
            scalers: ServiceStatus::from_loaded(false),
        };
        let json = serde_json::to_value(services).unwrap();
        assert_eq!(json["ml_model"], "loaded");
        assert_eq!(json["scalers"], "error");
    }
}
