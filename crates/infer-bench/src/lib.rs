pub mod accuracy;
pub mod bench_config;
pub mod comparison;
pub mod config_manager;
pub mod errors;
pub mod measurement;
pub mod metric;
pub mod run_stats;
pub mod session;

// Re-export main components for easier use
pub use accuracy::{AccuracyEvaluator, AccuracyMetrics, ConfusionMatrix};
pub use bench_config::BenchConfig;
pub use comparison::{ComparisonMetric, ComparisonResult, VariantComparator};
pub use config_manager::ConfigManager;
pub use errors::{BenchError, BenchResult};
pub use measurement::Measurement;
pub use metric::{Direction, MetricId};
pub use run_stats::{RunMetrics, RunStatsAggregator};
pub use session::{BenchSession, RunInput, SessionInput, SessionReport};
