//! Shared application state handed to every request handler

use crate::metrics::ServiceMetrics;
use crate::models::inference::InferenceContext;
use std::sync::Arc;

pub struct AppState {
    /// Loaded artifacts, read-only for the life of the process
    pub context: Arc<InferenceContext>,
    pub metrics: Arc<ServiceMetrics>,
}

impl AppState {
    pub fn new(context: InferenceContext) -> Self {
        Self::with_metrics(context, Arc::new(ServiceMetrics::new()))
    }

    pub fn with_metrics(context: InferenceContext, metrics: Arc<ServiceMetrics>) -> Self {
        Self {
            context: Arc::new(context),
            metrics,
        }
    }
}

pub type SharedState = Arc<AppState>;
