//! Health check endpoint

use axum::{extract::State, Json};

use crate::state::SharedState;
use crate::types::response::{HealthResponse, ServiceStatus, ServicesStatus};

/// Version reported by `/health`, independent of the crate version.
pub const API_VERSION: &str = "1.0.0";

/// GET /health - Always 200; degraded artifacts are reported in the payload
pub async fn health_check(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: API_VERSION.to_string(),
        services: ServicesStatus {
            ml_model: ServiceStatus::from_loaded(state.context.model_loaded()),
            scalers: ServiceStatus::from_loaded(state.context.scalers_loaded()),
        },
    })
}
