//! Metrics endpoint

use axum::{extract::State, Json};

use crate::metrics::MetricsSnapshot;
use crate::state::SharedState;

/// GET /metrics - Request counters, latency percentiles and crop distribution
pub async fn get_metrics(State(state): State<SharedState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}
