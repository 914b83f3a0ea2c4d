use crate::errors::{BenchError, BenchResult};
use crate::metric::MetricId;
use crate::run_stats::RunMetrics;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Winning run for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMetric {
    /// Winning venue, lower-cased
    pub mode: String,
    #[serde(with = "crate::run_stats::extended_f64")]
    pub value: f64,
    pub optimization_variant: String,
}

impl ComparisonMetric {
    fn from_run(run: &RunMetrics, metric: MetricId) -> Self {
        Self {
            mode: run.label.to_lowercase(),
            value: metric.value(run),
            optimization_variant: run.optimization.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub latency: ComparisonMetric,
    pub throughput: ComparisonMetric,
    pub memory: ComparisonMetric,
    pub best_latency_server_venue: ComparisonMetric,
    pub best_latency_browser_venue: ComparisonMetric,
}

/// Left fold keeping the first run on ties.
fn reduce_best<'a, I>(runs: I, metric: MetricId) -> Option<&'a RunMetrics>
where
    I: IntoIterator<Item = &'a RunMetrics>,
{
    let direction = metric.direction();
    runs.into_iter().fold(None, |best, run| match best {
        Some(incumbent) if !direction.prefers(metric.value(run), metric.value(incumbent)) => {
            Some(incumbent)
        }
        _ => Some(run),
    })
}

/// Picks the best variant per metric across a session's runs.
pub struct VariantComparator {
    browser_venue: String,
    server_venue: String,
}

impl Default for VariantComparator {
    fn default() -> Self {
        Self::new("Browser", "Server")
    }
}

impl VariantComparator {
    pub fn new(browser_venue: impl Into<String>, server_venue: impl Into<String>) -> Self {
        Self {
            browser_venue: browser_venue.into(),
            server_venue: server_venue.into(),
        }
    }

    pub fn browser_venue(&self) -> &str {
        &self.browser_venue
    }

    pub fn server_venue(&self) -> &str {
        &self.server_venue
    }

    /// Best run over the whole session for `metric`.
    pub fn best_by<'a>(
        &self,
        runs: &'a [RunMetrics],
        metric: MetricId,
    ) -> BenchResult<&'a RunMetrics> {
        reduce_best(runs, metric).ok_or(BenchError::EmptySession)
    }

    /// Lowest average latency among runs on `venue`.
    pub fn best_latency_for_venue<'a>(
        &self,
        runs: &'a [RunMetrics],
        venue: &str,
    ) -> BenchResult<&'a RunMetrics> {
        if runs.is_empty() {
            return Err(BenchError::EmptySession);
        }
        let subset: Vec<&RunMetrics> = runs.iter().filter(|run| run.label == venue).collect();
        reduce_best(subset, MetricId::AvgLatency).ok_or_else(|| BenchError::missing_venue(venue))
    }

    /// Lower of the two venue winners; the browser venue wins an exact tie.
    pub fn best_overall_latency<'a>(&self, runs: &'a [RunMetrics]) -> BenchResult<&'a RunMetrics> {
        let browser = self.best_latency_for_venue(runs, &self.browser_venue)?;
        let server = self.best_latency_for_venue(runs, &self.server_venue)?;
        if server.avg_latency < browser.avg_latency {
            Ok(server)
        } else {
            Ok(browser)
        }
    }

    pub fn best_throughput<'a>(&self, runs: &'a [RunMetrics]) -> BenchResult<&'a RunMetrics> {
        self.best_by(runs, MetricId::Throughput)
    }

    /// Most negative average delta wins, since negative means memory was released.
    pub fn best_memory<'a>(&self, runs: &'a [RunMetrics]) -> BenchResult<&'a RunMetrics> {
        self.best_by(runs, MetricId::AvgMemory)
    }

    pub fn compare(&self, runs: &[RunMetrics]) -> BenchResult<ComparisonResult> {
        if runs.is_empty() {
            return Err(BenchError::EmptySession);
        }
        let browser = self.best_latency_for_venue(runs, &self.browser_venue)?;
        let server = self.best_latency_for_venue(runs, &self.server_venue)?;
        let overall = self.best_overall_latency(runs)?;
        let throughput = self.best_throughput(runs)?;
        let memory = self.best_memory(runs)?;

        debug!(
            runs = runs.len(),
            latency_winner = %overall.optimization,
            throughput_winner = %throughput.optimization,
            memory_winner = %memory.optimization,
            "compared session"
        );

        Ok(ComparisonResult {
            latency: ComparisonMetric::from_run(overall, MetricId::AvgLatency),
            throughput: ComparisonMetric::from_run(throughput, MetricId::Throughput),
            memory: ComparisonMetric::from_run(memory, MetricId::AvgMemory),
            best_latency_server_venue: ComparisonMetric::from_run(server, MetricId::AvgLatency),
            best_latency_browser_venue: ComparisonMetric::from_run(browser, MetricId::AvgLatency),
        })
    }
}
