//! Held-out evaluation metrics for binary classifiers

use crate::error::{ChurnError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Cumulative (fp, tp) counts at each distinct score, highest score first
fn threshold_counts(y_true: &Array1<f64>, scores: &Array1<f64>) -> Result<(Vec<(f64, f64)>, f64, f64)> {
    if y_true.len() != scores.len() {
        return Err(ChurnError::ShapeError {
            expected: format!("{} scores", y_true.len()),
            actual: format!("{} scores", scores.len()),
        });
    }
    if scores.iter().any(|s| !s.is_finite()) {
        return Err(ChurnError::ComputationError("scores contain non-finite values".to_string()));
    }

    let positives = y_true.iter().filter(|&&v| v > 0.5).count() as f64;
    let negatives = y_true.len() as f64 - positives;
    if positives == 0.0 || negatives == 0.0 {
        return Err(ChurnError::ComputationError(
            "ranking metrics need both classes in the evaluation rows".to_string(),
        ));
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(Ordering::Equal));

    let mut counts = Vec::new();
    let (mut fp, mut tp) = (0.0, 0.0);
    for (pos, &i) in order.iter().enumerate() {
        if y_true[i] > 0.5 {
            tp += 1.0;
        } else {
            fp += 1.0;
        }
        let group_ends = order
            .get(pos + 1)
            .map_or(true, |&next| scores[next] != scores[i]);
        if group_ends {
            counts.push((fp, tp));
        }
    }

    Ok((counts, positives, negatives))
}

/// Area under the ROC curve; tied scores form one diagonal segment
pub fn roc_auc(y_true: &Array1<f64>, scores: &Array1<f64>) -> Result<f64> {
    let (counts, positives, negatives) = threshold_counts(y_true, scores)?;

    let mut area = 0.0;
    let (mut prev_fp, mut prev_tp) = (0.0, 0.0);
    for (fp, tp) in counts {
        area += (fp - prev_fp) * (tp + prev_tp) / 2.0;
        prev_fp = fp;
        prev_tp = tp;
    }

    Ok(area / (positives * negatives))
}

/// Average precision: sum over thresholds of (ΔRecall × Precision)
pub fn average_precision(y_true: &Array1<f64>, scores: &Array1<f64>) -> Result<f64> {
    let (counts, positives, _) = threshold_counts(y_true, scores)?;

    let mut ap = 0.0;
    let mut prev_recall = 0.0;
    for (fp, tp) in counts {
        let recall = tp / positives;
        let precision = tp / (tp + fp);
        ap += (recall - prev_recall) * precision;
        prev_recall = recall;
    }

    Ok(ap)
}

/// Precision, recall and F1 for one class
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: usize,
}

impl ClassMetrics {
    fn from_counts(true_pos: usize, false_pos: usize, false_neg: usize) -> Self {
        let ratio = |num: usize, den: usize| if den > 0 { num as f64 / den as f64 } else { 0.0 };
        let precision = ratio(true_pos, true_pos + false_pos);
        let recall = ratio(true_pos, true_pos + false_neg);
        let f1_score = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self {
            precision,
            recall,
            f1_score,
            support: true_pos + false_neg,
        }
    }
}

/// Confusion counts with class 1 as positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_negative: usize,
    pub false_positive: usize,
    pub false_negative: usize,
    pub true_positive: usize,
}

/// Per-class and averaged diagnostics at a fixed threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub threshold: f64,
    pub negative: ClassMetrics,
    pub positive: ClassMetrics,
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
    pub confusion: ConfusionMatrix,
}

impl ClassificationReport {
    /// Label each row 1 when its probability is at least `threshold`
    pub fn from_probabilities(y_true: &Array1<f64>, proba: &Array1<f64>, threshold: f64) -> Result<Self> {
        if y_true.len() != proba.len() {
            return Err(ChurnError::ShapeError {
                expected: format!("{} probabilities", y_true.len()),
                actual: format!("{} probabilities", proba.len()),
            });
        }
        if y_true.is_empty() {
            return Err(ChurnError::ComputationError("no rows to report on".to_string()));
        }

        let mut confusion = ConfusionMatrix {
            true_negative: 0,
            false_positive: 0,
            false_negative: 0,
            true_positive: 0,
        };
        for (&t, &p) in y_true.iter().zip(proba.iter()) {
            match (t > 0.5, p >= threshold) {
                (true, true) => confusion.true_positive += 1,
                (false, true) => confusion.false_positive += 1,
                (false, false) => confusion.true_negative += 1,
                (true, false) => confusion.false_negative += 1,
            }
        }

        let c = &confusion;
        let positive = ClassMetrics::from_counts(c.true_positive, c.false_positive, c.false_negative);
        let negative = ClassMetrics::from_counts(c.true_negative, c.false_negative, c.false_positive);
        let total = y_true.len();

        let average = |w_neg: f64, w_pos: f64| ClassMetrics {
            precision: w_neg * negative.precision + w_pos * positive.precision,
            recall: w_neg * negative.recall + w_pos * positive.recall,
            f1_score: w_neg * negative.f1_score + w_pos * positive.f1_score,
            support: total,
        };
        let macro_avg = average(0.5, 0.5);
        let weighted_avg = average(
            negative.support as f64 / total as f64,
            positive.support as f64 / total as f64,
        );

        Ok(Self {
            threshold,
            negative,
            positive,
            accuracy: (c.true_positive + c.true_negative) as f64 / total as f64,
            macro_avg,
            weighted_avg,
            confusion,
        })
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row = |f: &mut fmt::Formatter<'_>, label: &str, m: &ClassMetrics| {
            writeln!(
                f,
                "{:>12} {:>9.4} {:>9.4} {:>9.4} {:>9}",
                label, m.precision, m.recall, m.f1_score, m.support
            )
        };

        writeln!(f, "{:>12} {:>9} {:>9} {:>9} {:>9}", "", "precision", "recall", "f1-score", "support")?;
        row(f, "0", &self.negative)?;
        row(f, "1", &self.positive)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:>12} {:>9} {:>9} {:>9.4} {:>9}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        row(f, "macro avg", &self.macro_avg)?;
        row(f, "weighted avg", &self.weighted_avg)?;
        write!(
            f,
            "confusion (threshold {}): tn={} fp={} fn={} tp={}",
            self.threshold,
            self.confusion.true_negative,
            self.confusion.false_positive,
            self.confusion.false_negative,
            self.confusion.true_positive
        )
    }
}
