use super::{load_config, read_json, summary, write_json};
use anyhow::{Context, Result};
use infer_bench::{MetricId, RunMetrics, VariantComparator};
use std::path::{Path, PathBuf};

/// Compare previously aggregated run metrics.
pub fn handle_compare(
    metrics_file: &Path,
    config_file: Option<&Path>,
    metric: Option<MetricId>,
    output: Option<&PathBuf>,
    format: &str,
) -> Result<()> {
    let config = load_config(config_file)?;
    let runs: Vec<RunMetrics> = read_json(metrics_file)?;
    let comparator = VariantComparator::new(config.local_venue, config.remote_venue);

    if let Some(metric) = metric {
        let best = comparator
            .best_by(&runs, metric)
            .with_context(|| format!("Failed to select best run by {}", metric))?;
        match format {
            "json" => return write_json(best, output),
            _ => {
                println!(
                    "Best {}: {:.2} {} ({} - {})",
                    metric,
                    metric.value(best),
                    metric.unit(),
                    best.label,
                    best.optimization
                );
                if output.is_some() {
                    write_json(best, output)?;
                }
                return Ok(());
            }
        }
    }

    let comparison = comparator.compare(&runs)?;
    match format {
        "json" => write_json(&comparison, output),
        _ => {
            println!("{}", summary(&comparison));
            if output.is_some() {
                write_json(&comparison, output)?;
            }
            Ok(())
        }
    }
}
