//! Scoring configuration

use serde::{Deserialize, Serialize};

/// Configuration for batch scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Rows transformed and predicted per batch
    pub batch_size: usize,

    /// Name of the probability output column
    pub probability_column: String,

    /// Name of the thresholded label output column
    pub label_column: String,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            batch_size: 10_000,
            probability_column: "pred_proba".to_string(),
            label_column: "pred_label".to_string(),
        }
    }
}

impl ScoringConfig {
    /// Create a new scoring configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set batch size
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }
}
