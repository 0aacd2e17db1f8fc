//! Missing value imputation strategies

use serde::{Deserialize, Serialize};

/// Strategy for imputing missing numeric values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImputeStrategy {
    /// Replace with median of the fitting rows
    Median,
    /// Replace with mean of the fitting rows
    Mean,
    /// Replace with a constant value
    Constant(f64),
}

impl Default for ImputeStrategy {
    fn default() -> Self {
        ImputeStrategy::Median
    }
}

impl ImputeStrategy {
    /// Fill value learned from the observed (non-missing) values.
    ///
    /// Returns `None` when a statistic is required but nothing was observed.
    pub fn fill_value(&self, observed: &[f64]) -> Option<f64> {
        match self {
            ImputeStrategy::Median => median(observed),
            ImputeStrategy::Mean => {
                if observed.is_empty() {
                    None
                } else {
                    Some(observed.iter().sum::<f64>() / observed.len() as f64)
                }
            }
            ImputeStrategy::Constant(val) => Some(*val),
        }
    }
}

/// Median with the midpoint rule for even counts
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
