//! HTTP router construction

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::routes;
use crate::state::SharedState;

/// Build the service router. Cross-origin requests are allowed from any origin.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/predict", post(routes::predict::predict))
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::metrics::get_metrics))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
