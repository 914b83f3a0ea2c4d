use super::{load_config, read_json, summary, write_json};
use anyhow::Result;
use infer_bench::{BenchSession, SessionInput};
use std::path::{Path, PathBuf};

/// Aggregate and compare every run in a collected session file.
pub fn handle_run(
    session_file: &Path,
    config_file: Option<&Path>,
    output: Option<&PathBuf>,
    format: &str,
) -> Result<()> {
    let config = load_config(config_file)?;
    let input: SessionInput = read_json(session_file)?;
    tracing::info!(
        "Loaded {} runs from {}",
        input.runs.len(),
        session_file.display()
    );

    let report = BenchSession::new(config).evaluate(&input.runs)?;

    match format {
        "json" => write_json(&report, output),
        _ => {
            for record in &report.runs {
                let m = &record.metrics;
                println!(
                    "{} {:<8} {:<10} avg {:>9.2} ms  p95 {:>9.2} ms  {:>8.2} samples/s  f1 {:.3}  success {}",
                    record.model,
                    m.label,
                    m.optimization,
                    m.avg_latency,
                    m.p95_latency,
                    m.throughput,
                    m.f1_score,
                    m.success_rate_display()
                );
            }
            println!("\n{}", summary(&report.comparison));
            if output.is_some() {
                write_json(&report, output)?;
            }
            Ok(())
        }
    }
}
