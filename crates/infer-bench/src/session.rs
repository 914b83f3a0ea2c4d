use crate::accuracy::AccuracyEvaluator;
use crate::bench_config::BenchConfig;
use crate::comparison::{ComparisonResult, VariantComparator};
use crate::errors::BenchResult;
use crate::measurement::{LabelPairs, Measurement};
use crate::run_stats::{RunMetrics, RunStatsAggregator};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Measurements collected for one (model, venue, variant) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunInput {
    pub model: String,
    pub label: String,
    pub optimization: String,
    /// Overrides the configured class count for this model
    #[serde(default)]
    pub num_classes: Option<usize>,
    pub measurements: Vec<Measurement>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionInput {
    pub runs: Vec<RunInput>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunRecord {
    pub model: String,
    pub num_samples: usize,
    pub recorded_at: DateTime<Utc>,
    pub metrics: RunMetrics,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionReport {
    pub runs: Vec<RunRecord>,
    pub comparison: ComparisonResult,
}

impl SessionReport {
    pub fn metrics(&self) -> Vec<RunMetrics> {
        self.runs.iter().map(|r| r.metrics.clone()).collect()
    }
}

/// Drives accuracy evaluation, aggregation and comparison for a whole session
pub struct BenchSession {
    config: BenchConfig,
    aggregator: RunStatsAggregator,
    comparator: VariantComparator,
}

impl BenchSession {
    pub fn new(config: BenchConfig) -> Self {
        let aggregator = RunStatsAggregator::new(config.remote_venue.clone());
        let comparator =
            VariantComparator::new(config.local_venue.clone(), config.remote_venue.clone());
        Self {
            config,
            aggregator,
            comparator,
        }
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn comparator(&self) -> &VariantComparator {
        &self.comparator
    }

    /// Aggregate a single completed run.
    pub fn evaluate_run(&self, run: &RunInput) -> BenchResult<RunRecord> {
        let num_classes = run
            .num_classes
            .unwrap_or_else(|| self.config.num_classes_for(&run.model));
        let labels = LabelPairs::from_measurements(&run.measurements)?;
        let accuracy = AccuracyEvaluator::new(num_classes)
            .evaluate(&labels.actual, &labels.predicted)?
            .metrics;
        let metrics = self
            .aggregator
            .aggregate(&run.measurements, &run.label, &run.optimization, accuracy)?;

        Ok(RunRecord {
            model: run.model.clone(),
            num_samples: run.measurements.len(),
            recorded_at: Utc::now(),
            metrics,
        })
    }

    /// Aggregate every run in order, then compare. Any failure aborts the session.
    pub fn evaluate(&self, runs: &[RunInput]) -> BenchResult<SessionReport> {
        info!("Evaluating session with {} runs", runs.len());

        let mut records = Vec::with_capacity(runs.len());
        for (index, run) in runs.iter().enumerate() {
            debug!(
                index,
                model = %run.model,
                label = %run.label,
                optimization = %run.optimization,
                "evaluating run"
            );
            records.push(self.evaluate_run(run)?);
        }

        let metrics: Vec<RunMetrics> = records.iter().map(|r| r.metrics.clone()).collect();
        let comparison = self.comparator.compare(&metrics)?;
        info!(
            "Best latency: {} ({}) at {:.2} ms",
            comparison.latency.mode,
            comparison.latency.optimization_variant,
            comparison.latency.value
        );

        Ok(SessionReport {
            runs: records,
            comparison,
        })
    }
}
