use crate::run_stats::RunMetrics;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which way a metric improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    LowerIsBetter,
    HigherIsBetter,
}

impl Direction {
    /// Strict comparison: equal values never displace the incumbent.
    pub fn prefers(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Direction::LowerIsBetter => candidate < incumbent,
            Direction::HigherIsBetter => candidate > incumbent,
        }
    }
}

/// Numeric fields of [`RunMetrics`] addressable by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricId {
    Precision,
    Recall,
    F1Score,
    RocAuc,
    AvgLatency,
    MinLatency,
    MaxLatency,
    MedianLatency,
    P95Latency,
    P99Latency,
    StdDevLatency,
    ColdLatency,
    WarmLatency,
    Throughput,
    AvgMemory,
    PeakMemory,
    EndToEndLatency,
    SuccessRate,
    TimeToFirst,
    Jitter,
    Rtt,
}

impl MetricId {
    pub const ALL: [MetricId; 21] = [
        MetricId::Precision,
        MetricId::Recall,
        MetricId::F1Score,
        MetricId::RocAuc,
        MetricId::AvgLatency,
        MetricId::MinLatency,
        MetricId::MaxLatency,
        MetricId::MedianLatency,
        MetricId::P95Latency,
        MetricId::P99Latency,
        MetricId::StdDevLatency,
        MetricId::ColdLatency,
        MetricId::WarmLatency,
        MetricId::Throughput,
        MetricId::AvgMemory,
        MetricId::PeakMemory,
        MetricId::EndToEndLatency,
        MetricId::SuccessRate,
        MetricId::TimeToFirst,
        MetricId::Jitter,
        MetricId::Rtt,
    ];

    pub fn value(self, run: &RunMetrics) -> f64 {
        match self {
            MetricId::Precision => run.precision,
            MetricId::Recall => run.recall,
            MetricId::F1Score => run.f1_score,
            MetricId::RocAuc => run.roc_auc,
            MetricId::AvgLatency => run.avg_latency,
            MetricId::MinLatency => run.min_latency,
            MetricId::MaxLatency => run.max_latency,
            MetricId::MedianLatency => run.median_latency,
            MetricId::P95Latency => run.p95_latency,
            MetricId::P99Latency => run.p99_latency,
            MetricId::StdDevLatency => run.std_dev_latency,
            MetricId::ColdLatency => run.cold_latency,
            MetricId::WarmLatency => run.warm_latency,
            MetricId::Throughput => run.throughput,
            MetricId::AvgMemory => run.avg_memory_mb,
            MetricId::PeakMemory => run.peak_memory_mb,
            MetricId::EndToEndLatency => run.end_to_end_latency_ms,
            MetricId::SuccessRate => run.success_rate,
            MetricId::TimeToFirst => run.time_to_first_ms,
            MetricId::Jitter => run.jitter_ms,
            MetricId::Rtt => run.rtt_ms,
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            MetricId::Precision
            | MetricId::Recall
            | MetricId::F1Score
            | MetricId::RocAuc
            | MetricId::Throughput
            | MetricId::SuccessRate => Direction::HigherIsBetter,
            _ => Direction::LowerIsBetter,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MetricId::Precision => "Precision",
            MetricId::Recall => "Recall",
            MetricId::F1Score => "F1 Score",
            MetricId::RocAuc => "ROC-AUC",
            MetricId::AvgLatency => "Avg Latency",
            MetricId::MinLatency => "Min Latency",
            MetricId::MaxLatency => "Max Latency",
            MetricId::MedianLatency => "Median Latency",
            MetricId::P95Latency => "P95 Latency",
            MetricId::P99Latency => "P99 Latency",
            MetricId::StdDevLatency => "Std Dev",
            MetricId::ColdLatency => "Cold Latency",
            MetricId::WarmLatency => "Warm Latency",
            MetricId::Throughput => "Throughput",
            MetricId::AvgMemory => "Avg Memory",
            MetricId::PeakMemory => "Peak Memory",
            MetricId::EndToEndLatency => "End-to-End Latency",
            MetricId::SuccessRate => "Success Rate",
            MetricId::TimeToFirst => "Time to First Result",
            MetricId::Jitter => "Jitter",
            MetricId::Rtt => "RTT",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            MetricId::Precision | MetricId::Recall | MetricId::F1Score | MetricId::RocAuc => "0-1",
            MetricId::Throughput => "samples/sec",
            MetricId::AvgMemory | MetricId::PeakMemory => "MB",
            MetricId::SuccessRate => "%",
            _ => "ms",
        }
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
