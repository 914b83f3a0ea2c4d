use crate::accuracy::AccuracyMetrics;
use crate::errors::{BenchError, BenchResult};
use crate::measurement::Measurement;
use serde::{Deserialize, Serialize};
use tracing::debug;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Aggregated statistics for one benchmark run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Execution venue, e.g. "Browser" or "Server"
    pub label: String,
    /// Optimization variant within the venue
    pub optimization: String,

    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub roc_auc: f64,

    pub avg_latency: f64,
    pub min_latency: f64,
    pub max_latency: f64,
    pub median_latency: f64,
    pub p95_latency: f64,
    pub p99_latency: f64,
    pub std_dev_latency: f64,
    pub cold_latency: f64,
    pub warm_latency: f64,

    /// Reciprocal of the mean latency, in samples per second; infinite when
    /// every latency is zero
    #[serde(with = "extended_f64")]
    pub throughput: f64,
    pub avg_memory_mb: f64,
    pub peak_memory_mb: f64,
    pub end_to_end_latency_ms: f64,
    /// Percentage of samples with a prediction, rounded to two decimals
    pub success_rate: f64,

    pub time_to_first_ms: f64,
    pub jitter_ms: f64,
    /// Mean latency for remote runs, 0 otherwise
    pub rtt_ms: f64,
    pub total_iterations: usize,
}

impl RunMetrics {
    pub fn accuracy(&self) -> AccuracyMetrics {
        AccuracyMetrics {
            precision: self.precision,
            recall: self.recall,
            f1_score: self.f1_score,
            roc_auc: self.roc_auc,
        }
    }

    pub fn success_rate_display(&self) -> String {
        format!("{:.2}%", self.success_rate)
    }
}

/// JSON has no infinities or NaN. Non-finite values are written as the strings
/// "inf", "-inf" and "NaN" so a report can be read back.
pub(crate) mod extended_f64 {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_sign_positive() {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Text(text) => match text.as_str() {
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                "NaN" => Ok(f64::NAN),
                other => Err(D::Error::custom(format!("invalid number '{}'", other))),
            },
        }
    }
}

/// Nearest-rank lookup on an ascending slice.
fn nearest_rank(sorted: &[f64], fraction: f64) -> f64 {
    let index = (sorted.len() as f64 * fraction).floor() as usize;
    sorted[index.min(sorted.len() - 1)]
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub struct RunStatsAggregator {
    remote_venue: String,
}

impl Default for RunStatsAggregator {
    fn default() -> Self {
        Self::new("Server")
    }
}

impl RunStatsAggregator {
    /// `remote_venue` names the venue whose mean latency is reported as round-trip time.
    pub fn new(remote_venue: impl Into<String>) -> Self {
        Self {
            remote_venue: remote_venue.into(),
        }
    }

    pub fn aggregate(
        &self,
        measurements: &[Measurement],
        label: &str,
        optimization: &str,
        accuracy: AccuracyMetrics,
    ) -> BenchResult<RunMetrics> {
        if measurements.is_empty() {
            return Err(BenchError::EmptyRun);
        }
        if let Some((index, m)) = measurements
            .iter()
            .enumerate()
            .find(|(_, m)| !m.latency.is_finite() || m.latency < 0.0)
        {
            return Err(BenchError::invalid_input(format!(
                "measurement {} has invalid latency {}",
                index, m.latency
            )));
        }

        let n = measurements.len() as f64;
        let latencies: Vec<f64> = measurements.iter().map(|m| m.latency).collect();
        let mut sorted = latencies.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let sum: f64 = latencies.iter().sum();
        let mean = sum / n;
        let variance = latencies.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();

        let cold = latencies[0];
        let warm = if latencies.len() > 1 {
            latencies[1..].iter().sum::<f64>() / (n - 1.0)
        } else {
            0.0
        };

        let successes = measurements.iter().filter(|m| m.succeeded()).count();
        let total_memory: i64 = measurements.iter().map(|m| m.memory_delta_bytes).sum();
        let peak_memory = measurements
            .iter()
            .map(|m| m.memory_delta_bytes)
            .max()
            .unwrap_or_default();

        debug!(
            label,
            optimization,
            samples = measurements.len(),
            mean,
            successes,
            "aggregated run"
        );

        Ok(RunMetrics {
            label: label.to_string(),
            optimization: optimization.to_string(),
            precision: accuracy.precision,
            recall: accuracy.recall,
            f1_score: accuracy.f1_score,
            roc_auc: accuracy.roc_auc,
            avg_latency: mean,
            min_latency: sorted[0],
            max_latency: sorted[sorted.len() - 1],
            median_latency: nearest_rank(&sorted, 0.5),
            p95_latency: nearest_rank(&sorted, 0.95),
            p99_latency: nearest_rank(&sorted, 0.99),
            std_dev_latency: std_dev,
            cold_latency: cold,
            warm_latency: warm,
            throughput: 1000.0 / mean,
            avg_memory_mb: total_memory as f64 / n / BYTES_PER_MB,
            peak_memory_mb: peak_memory as f64 / BYTES_PER_MB,
            end_to_end_latency_ms: sum,
            success_rate: round_to_hundredths(successes as f64 / n * 100.0),
            time_to_first_ms: cold,
            jitter_ms: std_dev,
            rtt_ms: if label == self.remote_venue { mean } else { 0.0 },
            total_iterations: measurements.len(),
        })
    }
}
