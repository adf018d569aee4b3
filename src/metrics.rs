//! Request metrics and statistics tracking for the prediction service.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::info;

/// Latency samples kept for percentile calculation
const LATENCY_WINDOW: usize = 10_000;

/// Metrics collector shared by all request handlers
pub struct ServiceMetrics {
    /// Successful predictions
    pub predictions_served: AtomicU64,
    /// Requests rejected for a missing field
    pub validation_failures: AtomicU64,
    /// Requests that failed after validation
    pub prediction_failures: AtomicU64,
    /// Successful predictions by crop name
    crops: RwLock<BTreeMap<String, u64>>,
    /// Prediction latencies (in microseconds)
    latencies: RwLock<Vec<u64>>,
    /// Start time for rate calculation
    start_time: Instant,
    started_at: DateTime<Utc>,
}

impl ServiceMetrics {
    pub fn new() -> Self {
        Self {
            predictions_served: AtomicU64::new(0),
            validation_failures: AtomicU64::new(0),
            prediction_failures: AtomicU64::new(0),
            crops: RwLock::new(BTreeMap::new()),
            latencies: RwLock::new(Vec::with_capacity(1000)),
            start_time: Instant::now(),
            started_at: Utc::now(),
        }
    }

    /// Record a successful prediction
    pub fn record_prediction(&self, crop: &str, latency: Duration) {
        self.predictions_served.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut crops) = self.crops.write() {
            *crops.entry(crop.to_string()).or_insert(0) += 1;
        }

        if let Ok(mut latencies) = self.latencies.write() {
            latencies.push(latency.as_micros() as u64);
            if latencies.len() > LATENCY_WINDOW {
                latencies.drain(0..LATENCY_WINDOW / 2);
            }
        }
    }

    pub fn record_validation_failure(&self) {
        self.validation_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_prediction_failure(&self) {
        self.prediction_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get latency statistics over the current window
    pub fn latency_stats(&self) -> LatencyStats {
        let mut sorted = match self.latencies.read() {
            Ok(latencies) => latencies.clone(),
            Err(_) => return LatencyStats::default(),
        };
        if sorted.is_empty() {
            return LatencyStats::default();
        }
        sorted.sort_unstable();

        let count = sorted.len();
        let percentile = |p: f64| sorted[((count as f64 * p) as usize).min(count - 1)];

        LatencyStats {
            count: count as u64,
            mean_us: sorted.iter().sum::<u64>() / count as u64,
            p50_us: sorted[count / 2],
            p95_us: percentile(0.95),
            p99_us: percentile(0.99),
            max_us: sorted[count - 1],
        }
    }

    /// Successful predictions per second since start
    pub fn throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.predictions_served.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn crop_distribution(&self) -> BTreeMap<String, u64> {
        self.crops.read().map(|c| c.clone()).unwrap_or_default()
    }

    /// Point-in-time view for the `/metrics` endpoint
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            started_at: self.started_at,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            predictions_served: self.predictions_served.load(Ordering::Relaxed),
            validation_failures: self.validation_failures.load(Ordering::Relaxed),
            prediction_failures: self.prediction_failures.load(Ordering::Relaxed),
            throughput: self.throughput(),
            latency: self.latency_stats(),
            crops: self.crop_distribution(),
        }
    }

    /// Log summary statistics
    pub fn print_summary(&self) {
        let snapshot = self.snapshot();
        let total =
            snapshot.predictions_served + snapshot.validation_failures + snapshot.prediction_failures;

        info!(
            requests = total,
            served = snapshot.predictions_served,
            validation_failures = snapshot.validation_failures,
            prediction_failures = snapshot.prediction_failures,
            throughput = format!("{:.1} req/s", snapshot.throughput),
            "Prediction service summary"
        );
        info!(
            mean_us = snapshot.latency.mean_us,
            p50_us = snapshot.latency.p50_us,
            p95_us = snapshot.latency.p95_us,
            p99_us = snapshot.latency.p99_us,
            "Prediction latency"
        );
        for (crop, count) in &snapshot.crops {
            let pct = if snapshot.predictions_served > 0 {
                (*count as f64 / snapshot.predictions_served as f64) * 100.0
            } else {
                0.0
            };
            info!("  {:12}: {:>6} ({:>5.1}%)", crop, count, pct);
        }
    }
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Latency statistics
#[derive(Debug, Default, Clone, Serialize)]
pub struct LatencyStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Serializable metrics view
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub started_at: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub predictions_served: u64,
    pub validation_failures: u64,
    pub prediction_failures: u64,
    pub throughput: f64,
    pub latency: LatencyStats,
    pub crops: BTreeMap<String, u64>,
}

/// Logs a metrics summary at a fixed interval
pub struct MetricsReporter {
    metrics: Arc<ServiceMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: Arc<ServiceMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs.max(1)));
        // first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}
