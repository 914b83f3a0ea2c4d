use anyhow::Result;
use clap::{Parser, Subcommand};
use infer_bench::MetricId;
use std::path::PathBuf;

use crate::commands::compare::handle_compare;
use crate::commands::run::handle_run;
use crate::logging::setup_logging;

#[derive(Parser)]
#[command(author, version, about = "Benchmark metrics and variant comparison", long_about = None)]
struct Cli {
    #[arg(
        long = "log-level",
        global = true,
        value_name = "LEVEL",
        help = "Console log level (error, warn, info, debug, trace)",
        long_help = "Console log level. Defaults to RUST_LOG, or info when RUST_LOG is unset."
    )]
    log_level: Option<String>,

    #[arg(
        long = "log-file",
        global = true,
        value_name = "FILE",
        help = "Also write debug logs as JSON lines to this file"
    )]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Aggregate collected measurements and compare the runs
    #[command(about = "Aggregate a session of collected measurements and compare variants")]
    Run {
        #[arg(
            short = 's',
            long = "session",
            value_name = "FILE",
            help = "Session file with the collected runs",
            long_help = "JSON file of the form {\"runs\": [...]}, one entry per (model, venue, variant) run with its measurements in temporal order."
        )]
        session: PathBuf,

        #[arg(short = 'c', long = "config", value_name = "FILE", help = "Bench config file (JSON)")]
        config: Option<PathBuf>,

        #[arg(
            long = "output",
            short = 'o',
            value_name = "FILE",
            help = "Save the session report to a file"
        )]
        output: Option<PathBuf>,

        #[arg(
            long = "format",
            value_name = "FORMAT",
            value_parser = ["text", "json"],
            help = "Output format (text, json)",
            default_value = "text"
        )]
        format: String,
    },

    /// Compare runs that were already aggregated
    #[command(about = "Select the best variants from a list of run metrics")]
    Compare {
        #[arg(
            short = 'm',
            long = "metrics",
            value_name = "FILE",
            help = "JSON array of run metrics"
        )]
        metrics: PathBuf,

        #[arg(short = 'c', long = "config", value_name = "FILE", help = "Bench config file (JSON)")]
        config: Option<PathBuf>,

        #[arg(
            long = "by",
            value_name = "METRIC",
            value_parser = parse_metric,
            help = "Only report the best run for this metric (e.g. p95_latency)"
        )]
        by: Option<MetricId>,

        #[arg(
            long = "output",
            short = 'o',
            value_name = "FILE",
            help = "Save the comparison to a file"
        )]
        output: Option<PathBuf>,

        #[arg(
            long = "format",
            value_name = "FORMAT",
            value_parser = ["text", "json"],
            help = "Output format (text, json)",
            default_value = "text"
        )]
        format: String,
    },
}

fn parse_metric(value: &str) -> Result<MetricId, String> {
    serde_json::from_value(serde_json::Value::String(value.to_string())).map_err(|_| {
        let known: Vec<String> = MetricId::ALL
            .iter()
            .filter_map(|m| serde_json::to_value(m).ok())
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        format!("unknown metric '{}', expected one of: {}", value, known.join(", "))
    })
}

pub fn cli() -> Result<()> {
    let cli = Cli::parse();
    let _guard = setup_logging(cli.log_level.as_deref(), cli.log_file.as_deref())?;

    match cli.command {
        Command::Run {
            session,
            config,
            output,
            format,
        } => handle_run(&session, config.as_deref(), output.as_ref(), &format),
        Command::Compare {
            metrics,
            config,
            by,
            output,
            format,
        } => handle_compare(&metrics, config.as_deref(), by, output.as_ref(), &format),
    }
}
