//! Test Prediction Client
//!
//! Generates soil samples and posts them to a running service's `/predict`
//! endpoint, then prints how the recommendations were distributed.

use crop_recommendation::SoilSample;
use futures::StreamExt;
use rand::Rng;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Sample generator for testing
struct SampleGenerator {
    rng: rand::rngs::ThreadRng,
}

impl SampleGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }

    /// Generate a random sample within the ranges seen in typical field data
    fn generate(&mut self) -> SoilSample {
        SoilSample {
            nitrogen: self.rng.gen_range(0.0..140.0_f64).round(),
            phosphorus: self.rng.gen_range(5.0..145.0_f64).round(),
            potassium: self.rng.gen_range(5.0..205.0_f64).round(),
            temperature: round2(self.rng.gen_range(8.0..44.0)),
            humidity: round2(self.rng.gen_range(14.0..100.0)),
            ph: round2(self.rng.gen_range(3.5..9.9)),
            rainfall: round2(self.rng.gen_range(20.0..300.0)),
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

enum Outcome {
    Crop(String),
    Rejected(String),
    Failed(String),
}

async fn send(client: &reqwest::Client, url: &str, sample: &SoilSample) -> Outcome {
    let response = match client.post(url).json(sample).send().await {
        Ok(response) => response,
        Err(e) => return Outcome::Failed(e.to_string()),
    };

    let status = response.status();
    match response.json::<Value>().await {
        Ok(body) if status.is_success() => Outcome::Crop(
            body["crop"].as_str().unwrap_or("<missing crop>").to_string(),
        ),
        Ok(body) => Outcome::Rejected(format!(
            "{}: {}",
            status,
            body["error"].as_str().unwrap_or("<no error message>")
        )),
        Err(e) => Outcome::Failed(e.to_string()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("test_client=info".parse()?),
        )
        .init();

    info!("Starting Test Prediction Client");

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let base_url = args
        .get(1)
        .map(|s| s.trim_end_matches('/').to_string())
        .unwrap_or_else(|| "http://localhost:5000".to_string());
    let count: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);
    let concurrency: usize = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(8);

    info!(
        base_url = %base_url,
        count = count,
        concurrency = concurrency,
        "Configuration loaded"
    );

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    // Check the service is up before sending load
    let health_url = format!("{}/health", base_url);
    match client.get(&health_url).send().await {
        Ok(response) => {
            let body: Value = response.json().await?;
            info!(services = %body["services"], "Service is reachable");
        }
        Err(e) => {
            warn!(error = %e, "Service unreachable. Running in dry-run mode.");
            return run_dry_mode(count);
        }
    }

    let mut generator = SampleGenerator::new();
    let samples: Vec<SoilSample> = (0..count).map(|_| generator.generate()).collect();

    let predict_url = format!("{}/predict", base_url);
    let started = Instant::now();

    let outcomes: Vec<Outcome> = futures::stream::iter(samples.iter())
        .map(|sample| send(&client, &predict_url, sample))
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let elapsed = started.elapsed();
    let mut crops: BTreeMap<String, usize> = BTreeMap::new();
    let mut rejected = 0;
    let mut failed = 0;

    for outcome in outcomes {
        match outcome {
            Outcome::Crop(crop) => *crops.entry(crop).or_insert(0) += 1,
            Outcome::Rejected(message) => {
                rejected += 1;
                warn!(error = %message, "Request rejected");
            }
            Outcome::Failed(message) => {
                failed += 1;
                warn!(error = %message, "Request failed");
            }
        }
    }

    info!(
        "Completed {} requests in {:.2}s ({:.1} req/s): {} rejected, {} failed",
        count,
        elapsed.as_secs_f64(),
        count as f64 / elapsed.as_secs_f64().max(f64::EPSILON),
        rejected,
        failed
    );
    for (crop, n) in &crops {
        info!("  {:12}: {}", crop, n);
    }

    Ok(())
}

fn run_dry_mode(count: usize) -> anyhow::Result<()> {
    info!("Running in dry-run mode (no service connection)");

    let mut generator = SampleGenerator::new();
    for i in 0..count {
        let sample = generator.generate();
        if (i + 1) % 10 == 0 || i == 0 {
            info!("Sample {}:\n{}", i + 1, serde_json::to_string_pretty(&sample)?);
        }
    }

    Ok(())
}
