//! Classification accuracy for a single benchmark run.
//!
//! Builds a confusion matrix from (actual, predicted) label pairs and derives
//! macro-averaged precision, recall and F1 plus a one-vs-rest AUC
//! approximation.

use crate::errors::{BenchError, BenchResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Square matrix where cell (i, j) counts samples of actual class i predicted as j.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    num_classes: usize,
    cells: Vec<u64>,
}

/// One-vs-rest counts for a single class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassCounts {
    pub true_pos: u64,
    pub false_pos: u64,
    pub false_neg: u64,
    pub true_neg: u64,
}

impl ConfusionMatrix {
    pub fn new(num_classes: usize) -> Self {
        Self {
            num_classes,
            cells: vec![0; num_classes * num_classes],
        }
    }

    /// Build a matrix from label sequences, rejecting mismatched lengths and
    /// labels outside `[0, num_classes)`.
    pub fn from_labels(
        actual: &[usize],
        predicted: &[usize],
        num_classes: usize,
    ) -> BenchResult<Self> {
        if num_classes == 0 {
            return Err(BenchError::invalid_input("number of classes must be positive"));
        }
        if actual.len() != predicted.len() {
            return Err(BenchError::invalid_input(format!(
                "label sequences differ in length: {} actual vs {} predicted",
                actual.len(),
                predicted.len()
            )));
        }

        let mut matrix = Self::new(num_classes);
        for (k, (&a, &p)) in actual.iter().zip(predicted.iter()).enumerate() {
            if a >= num_classes || p >= num_classes {
                return Err(BenchError::invalid_input(format!(
                    "sample {} has label out of range (actual {}, predicted {}, classes {})",
                    k, a, p, num_classes
                )));
            }
            matrix.cells[a * num_classes + p] += 1;
        }
        Ok(matrix)
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn get(&self, actual: usize, predicted: usize) -> u64 {
        self.cells[actual * self.num_classes + predicted]
    }

    pub fn row_sum(&self, actual: usize) -> u64 {
        (0..self.num_classes).map(|j| self.get(actual, j)).sum()
    }

    pub fn column_sum(&self, predicted: usize) -> u64 {
        (0..self.num_classes).map(|i| self.get(i, predicted)).sum()
    }

    /// Number of labeled samples
    pub fn total(&self) -> u64 {
        self.cells.iter().sum()
    }

    /// Number of correct predictions (diagonal sum)
    pub fn correct(&self) -> u64 {
        (0..self.num_classes).map(|i| self.get(i, i)).sum()
    }

    pub fn class_counts(&self, class: usize) -> ClassCounts {
        let true_pos = self.get(class, class);
        let false_pos = self.column_sum(class) - true_pos;
        let false_neg = self.row_sum(class) - true_pos;
        let true_neg = self.total() - true_pos - false_pos - false_neg;
        ClassCounts {
            true_pos,
            false_pos,
            false_neg,
            true_neg,
        }
    }

    pub fn rows(&self) -> Vec<Vec<u64>> {
        self.cells
            .chunks(self.num_classes)
            .map(|row| row.to_vec())
            .collect()
    }
}

fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

impl ClassCounts {
    pub fn precision(&self) -> f64 {
        let tp = self.true_pos as f64;
        ratio_or_zero(tp, tp + self.false_pos as f64)
    }

    pub fn recall(&self) -> f64 {
        let tp = self.true_pos as f64;
        ratio_or_zero(tp, tp + self.false_neg as f64)
    }

    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        ratio_or_zero(2.0 * p * r, p + r)
    }

    /// Correlation-style AUC proxy. `None` when the denominator is zero.
    pub fn auc(&self) -> Option<f64> {
        let tp = self.true_pos as f64;
        let fp = self.false_pos as f64;
        let fn_ = self.false_neg as f64;
        let tn = self.true_neg as f64;

        let denominator = ((tp + fn_) * (fp + tn) * (tp + fp) * (fn_ + tp)).sqrt();
        if denominator > 0.0 {
            Some((tp * tn - fp * fn_) / denominator)
        } else {
            None
        }
    }

    pub fn support(&self) -> u64 {
        self.true_pos + self.false_neg
    }
}

/// Aggregate accuracy figures copied into each run's metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AccuracyMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub roc_auc: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassScores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// `None` when the class has no defined AUC; it counts as 0 in the mean
    pub auc: Option<f64>,
    pub support: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccuracyReport {
    pub confusion: ConfusionMatrix,
    pub per_class: Vec<ClassScores>,
    pub metrics: AccuracyMetrics,
}

pub struct AccuracyEvaluator {
    num_classes: usize,
}

impl AccuracyEvaluator {
    pub fn new(num_classes: usize) -> Self {
        Self { num_classes }
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn evaluate(&self, actual: &[usize], predicted: &[usize]) -> BenchResult<AccuracyReport> {
        let confusion = ConfusionMatrix::from_labels(actual, predicted, self.num_classes)?;
        debug!(
            classes = self.num_classes,
            samples = confusion.total(),
            correct = confusion.correct(),
            "built confusion matrix"
        );

        let per_class: Vec<ClassScores> = (0..self.num_classes)
            .map(|class| {
                let counts = confusion.class_counts(class);
                ClassScores {
                    precision: counts.precision(),
                    recall: counts.recall(),
                    f1: counts.f1(),
                    auc: counts.auc(),
                    support: counts.support(),
                }
            })
            .collect();

        // Unweighted mean over every class, zero-support classes included.
        let n = self.num_classes as f64;
        let metrics = AccuracyMetrics {
            precision: per_class.iter().map(|c| c.precision).sum::<f64>() / n,
            recall: per_class.iter().map(|c| c.recall).sum::<f64>() / n,
            f1_score: per_class.iter().map(|c| c.f1).sum::<f64>() / n,
            roc_auc: per_class.iter().map(|c| c.auc.unwrap_or(0.0)).sum::<f64>() / n,
        };

        Ok(AccuracyReport {
            confusion,
            per_class,
            metrics,
        })
    }
}

/// Shorthand for evaluating labels and keeping only the aggregate metrics.
pub fn compute_metrics(
    actual: &[usize],
    predicted: &[usize],
    num_classes: usize,
) -> BenchResult<AccuracyMetrics> {
    Ok(AccuracyEvaluator::new(num_classes).evaluate(actual, predicted)?.metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_two_class_scenario() {
        let report = AccuracyEvaluator::new(2)
            .evaluate(&[0, 1, 0, 1], &[0, 1, 1, 1])
            .unwrap();

        assert_eq!(report.confusion.rows(), vec![vec![1, 1], vec![0, 2]]);
        assert!((report.per_class[0].precision - 1.0).abs() < EPS);
        assert!((report.per_class[0].recall - 0.5).abs() < EPS);
        assert!((report.per_class[1].precision - 2.0 / 3.0).abs() < EPS);
        assert!((report.per_class[1].recall - 1.0).abs() < EPS);

        let expected_precision = (1.0 + 2.0 / 3.0) / 2.0;
        assert!((report.metrics.precision - expected_precision).abs() < EPS);
        assert!((report.metrics.recall - 0.75).abs() < EPS);
    }

    #[test]
    fn test_auc_approximation_values() {
        let report = AccuracyEvaluator::new(2)
            .evaluate(&[0, 1, 0, 1], &[0, 1, 1, 1])
            .unwrap();

        // class 0: tp=1 fp=0 fn=1 tn=2; class 1: tp=2 fp=1 fn=0 tn=1
        let auc0 = 2.0 / 8.0_f64.sqrt();
        let auc1 = 2.0 / 24.0_f64.sqrt();
        assert!((report.per_class[0].auc.unwrap() - auc0).abs() < EPS);
        assert!((report.per_class[1].auc.unwrap() - auc1).abs() < EPS);
        assert!((report.metrics.roc_auc - (auc0 + auc1) / 2.0).abs() < EPS);
    }

    #[test]
    fn test_undefined_auc_is_zero_filled() {
        // Every sample is class 0, so both classes have a zero AUC denominator.
        let report = AccuracyEvaluator::new(2).evaluate(&[0, 0], &[0, 0]).unwrap();

        assert_eq!(report.per_class[0].auc, None);
        assert_eq!(report.per_class[1].auc, None);
        assert_eq!(report.metrics.roc_auc, 0.0);
        assert!((report.metrics.precision - 0.5).abs() < EPS);
    }

    #[test]
    fn test_undefined_auc_does_not_hide_defined_classes() {
        // Class 2 never appears; its AUC is undefined and contributes 0.
        let report = AccuracyEvaluator::new(3)
            .evaluate(&[0, 1, 0, 1], &[0, 1, 0, 1])
            .unwrap();

        assert_eq!(report.per_class[2].auc, None);
        assert!((report.per_class[0].auc.unwrap() - 1.0).abs() < EPS);
        assert!((report.metrics.roc_auc - 2.0 / 3.0).abs() < EPS);
        assert!(!report.metrics.roc_auc.is_nan());
    }

    #[test]
    fn test_zero_support_class_scores_zero() {
        let report = AccuracyEvaluator::new(4)
            .evaluate(&[0, 1, 1], &[0, 1, 0])
            .unwrap();

        for class in &report.per_class[2..] {
            assert_eq!(class.precision, 0.0);
            assert_eq!(class.recall, 0.0);
            assert_eq!(class.f1, 0.0);
            assert_eq!(class.support, 0);
        }
    }

    #[test]
    fn test_empty_labels_yield_zero_metrics() {
        let metrics = compute_metrics(&[], &[], 3).unwrap();
        assert_eq!(metrics, AccuracyMetrics::default());
    }

    #[test_case(&[0, 1], &[0], 2 ; "length mismatch")]
    #[test_case(&[0, 2], &[0, 1], 2 ; "actual out of range")]
    #[test_case(&[0, 1], &[0, 5], 2 ; "predicted out of range")]
    #[test_case(&[], &[], 0 ; "no classes")]
    fn test_invalid_input(actual: &[usize], predicted: &[usize], num_classes: usize) {
        let err = compute_metrics(actual, predicted, num_classes).unwrap_err();
        assert!(matches!(err, BenchError::InvalidInput(_)));
    }

    fn labels(max_classes: usize) -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
        (1..max_classes).prop_flat_map(|classes| {
            (
                Just(classes),
                prop::collection::vec((0..classes, 0..classes), 0..64),
            )
        })
    }

    proptest! {
        #[test]
        fn prop_matrix_totals((classes, pairs) in labels(8)) {
            let (actual, predicted): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
            let cm = ConfusionMatrix::from_labels(&actual, &predicted, classes).unwrap();

            prop_assert_eq!(cm.total(), actual.len() as u64);
            prop_assert!(cm.correct() <= cm.total());
            let matches = actual.iter().zip(&predicted).filter(|(a, p)| a == p).count();
            prop_assert_eq!(cm.correct(), matches as u64);
        }

        #[test]
        fn prop_macro_scores_in_unit_range((classes, pairs) in labels(8)) {
            let (actual, predicted): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
            let m = compute_metrics(&actual, &predicted, classes).unwrap();

            for value in [m.precision, m.recall, m.f1_score] {
                prop_assert!((0.0..=1.0).contains(&value));
            }
            prop_assert!(!m.roc_auc.is_nan());
        }

        #[test]
        fn prop_evaluation_is_deterministic((classes, pairs) in labels(6)) {
            let (actual, predicted): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
            let first = compute_metrics(&actual, &predicted, classes).unwrap();
            let second = compute_metrics(&actual, &predicted, classes).unwrap();

            prop_assert_eq!(first.precision.to_bits(), second.precision.to_bits());
            prop_assert_eq!(first.recall.to_bits(), second.recall.to_bits());
            prop_assert_eq!(first.f1_score.to_bits(), second.f1_score.to_bits());
            prop_assert_eq!(first.roc_auc.to_bits(), second.roc_auc.to_bits());
        }
    }
}
