//! Configuration management for the crop recommendation service

use crate::models::loader::ArtifactPaths;
use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub artifacts: ArtifactsConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Artifact locations.
///
/// Relative paths are resolved against `dir`; a relative or absent `dir` is
/// itself resolved against the directory of the running executable.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    /// Base directory for artifacts
    pub dir: Option<PathBuf>,
    /// Classifier artifact (.onnx or .json)
    pub model: PathBuf,
    /// Min-max scaler artifact, applied first
    pub minmax_scaler: PathBuf,
    /// Standard scaler artifact, applied second
    pub standard_scaler: PathBuf,
    /// Intra-op threads per ONNX session
    pub onnx_threads: usize,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: None,
            model: PathBuf::from("model.onnx"),
            minmax_scaler: PathBuf::from("minmaxscaler.json"),
            standard_scaler: PathBuf::from("standscaler.json"),
            onnx_threads: 1,
        }
    }
}

impl ArtifactsConfig {
    /// Resolve artifact paths against the running executable's directory.
    pub fn resolve(&self) -> Result<ArtifactPaths> {
        let exe = std::env::current_exe().context("Failed to locate the running executable")?;
        let exe_dir = exe
            .parent()
            .context("Executable path has no parent directory")?;
        Ok(self.resolve_from(exe_dir))
    }

    /// Resolve artifact paths against an explicit anchor directory.
    pub fn resolve_from(&self, anchor: &Path) -> ArtifactPaths {
        let base = match &self.dir {
            Some(dir) => anchor.join(dir),
            None => anchor.to_path_buf(),
        };

        // Path::join keeps absolute right-hand sides as they are
        ArtifactPaths {
            model: base.join(&self.model),
            minmax_scaler: base.join(&self.minmax_scaler),
            standard_scaler: base.join(&self.standard_scaler),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Periodic metrics reporting
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct MetricsConfig {
    /// Seconds between logged summaries; 0 disables the reporter
    pub report_interval_secs: u64,
}

impl AppConfig {
    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Load from `path` when given, otherwise use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Ok(Self::default()),
        }
    }

    /// `host:port` string for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
