//! Crop Recommendation Service - Main Entry Point
//!
//! Loads the classifier and scalers once, then serves `/predict` and
//! `/health` over HTTP. Refuses to bind if any artifact fails to load.

use anyhow::Result;
use clap::Parser;
use crop_recommendation::{
    build_router,
    config::{AppConfig, LogFormat},
    metrics::{MetricsReporter, ServiceMetrics},
    AppState, InferenceContext,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Crop recommendation inference server
#[derive(Parser, Debug)]
#[command(name = "crop-recommendation")]
#[command(version)]
#[command(about = "HTTP inference server recommending a crop from soil and climate data")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory holding the model and scaler artifacts
    #[arg(long, env = "CROP_ARTIFACTS_DIR")]
    artifacts_dir: Option<PathBuf>,

    /// Log format (pretty, json)
    #[arg(long, value_parser = parse_log_format)]
    log_format: Option<LogFormat>,
}

fn parse_log_format(s: &str) -> Result<LogFormat, String> {
    match s.to_ascii_lowercase().as_str() {
        "pretty" => Ok(LogFormat::Pretty),
        "json" => Ok(LogFormat::Json),
        other => Err(format!("unknown log format '{}'", other)),
    }
}

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("crop_recommendation={}", config.logging.level).parse()?);

    match config.logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration, then apply command-line overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(dir) = cli.artifacts_dir {
        config.artifacts.dir = Some(dir);
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }

    init_logging(&config)?;
    info!("Starting Crop Recommendation Service v{}", env!("CARGO_PKG_VERSION"));

    let paths = config.artifacts.resolve()?;
    info!(
        model = %paths.model.display(),
        minmax_scaler = %paths.minmax_scaler.display(),
        standard_scaler = %paths.standard_scaler.display(),
        "Loading artifacts"
    );

    // Startup is all-or-nothing: never serve with a partially loaded model
    let context = match InferenceContext::load(&paths, config.artifacts.onnx_threads) {
        Ok(context) => context,
        Err(e) => {
            error!(error = %e, "Failed to load artifacts, refusing to start");
            return Err(e.into());
        }
    };

    let metrics = Arc::new(ServiceMetrics::new());
    if config.metrics.report_interval_secs > 0 {
        let reporter = MetricsReporter::new(metrics.clone(), config.metrics.report_interval_secs);
        tokio::spawn(reporter.start());
    }

    let state = Arc::new(AppState::with_metrics(context, metrics.clone()));
    let app = build_router(state);

    let addr: SocketAddr = config.bind_address().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Service shutting down...");
    metrics.print_summary();

    Ok(())
}
