pub mod compare;
pub mod run;

use anyhow::{Context, Result};
use infer_bench::{BenchConfig, ComparisonResult, ConfigManager};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Load the bench config from `path`, or defaults, then apply environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<BenchConfig> {
    let manager = match path {
        Some(path) => ConfigManager::from_path(path)?,
        None => ConfigManager::from_config(BenchConfig::default())?,
    };
    Ok(manager.into_config())
}

pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Write pretty JSON to `output`, or stdout when no path is given.
pub fn write_json<T: Serialize>(value: &T, output: Option<&PathBuf>) -> Result<()> {
    let output_str = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, &output_str)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Results saved to: {}", path.display());
        }
        None => println!("{}", output_str),
    }
    Ok(())
}

pub fn summary(comparison: &ComparisonResult) -> String {
    let line = |name: &str, metric: &infer_bench::ComparisonMetric| {
        format!(
            "{:<22} {:>12.2}  {} - {}",
            name, metric.value, metric.mode, metric.optimization_variant
        )
    };
    [
        line("Latency (ms)", &comparison.latency),
        line("Throughput (samples/s)", &comparison.throughput),
        line("Memory (MB)", &comparison.memory),
        line("Best server latency", &comparison.best_latency_server_venue),
        line("Best browser latency", &comparison.best_latency_browser_venue),
    ]
    .join("\n")
}
