use crate::errors::{BenchError, BenchResult};
use serde::{Deserialize, Serialize};

/// One observed sample outcome, as recorded by the inference layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Per-sample latency in milliseconds
    pub latency: f64,
    #[serde(default)]
    pub timestamp_ms: i64,
    /// Heap growth over the sample; negative when memory was released
    #[serde(default)]
    pub memory_delta_bytes: i64,
    /// Absent when inference failed for this sample
    #[serde(default)]
    pub predicted_label: Option<usize>,
    #[serde(default)]
    pub actual_label: Option<usize>,
}

impl Measurement {
    pub fn new(latency: f64, memory_delta_bytes: i64) -> Self {
        Self {
            latency,
            timestamp_ms: 0,
            memory_delta_bytes,
            predicted_label: None,
            actual_label: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp_ms: i64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    pub fn with_labels(mut self, actual: usize, predicted: Option<usize>) -> Self {
        self.actual_label = Some(actual);
        self.predicted_label = predicted;
        self
    }

    pub fn succeeded(&self) -> bool {
        self.predicted_label.is_some()
    }
}

/// Label sequences fed to the accuracy evaluator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelPairs {
    pub actual: Vec<usize>,
    pub predicted: Vec<usize>,
}

impl LabelPairs {
    /// Collect (actual, predicted) pairs from every measurement that produced a
    /// prediction. Failed samples are skipped; a prediction without a ground
    /// truth label is rejected.
    pub fn from_measurements(measurements: &[Measurement]) -> BenchResult<Self> {
        let mut pairs = LabelPairs::default();
        for (index, m) in measurements.iter().enumerate() {
            let Some(predicted) = m.predicted_label else {
                continue;
            };
            let actual = m.actual_label.ok_or_else(|| {
                BenchError::invalid_input(format!(
                    "measurement {} has a prediction but no actual label",
                    index
                ))
            })?;
            pairs.actual.push(actual);
            pairs.predicted.push(predicted);
        }
        Ok(pairs)
    }

    pub fn len(&self) -> usize {
        self.actual.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actual.is_empty()
    }
}
