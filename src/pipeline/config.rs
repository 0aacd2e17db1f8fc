//! End-to-end pipeline configuration

use crate::error::{ChurnError, Result};
use crate::feature_engineering::FeatureEngineeringConfig;
use crate::preprocessing::TransformConfig;
use crate::training::CandidateConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Label column
    pub target: String,

    /// Target values (case-insensitive) that mean churned
    pub positive_labels: Vec<String>,

    /// Columns never used as features (case-insensitive)
    pub identifier_columns: Vec<String>,

    /// Share of rows held out for evaluation
    pub test_fraction: f64,

    /// Seed for the split and every randomized estimator
    pub random_seed: u64,

    /// Probability at or above which a row is labelled 1
    pub threshold: f64,

    /// Competing estimators, in declaration order
    pub candidates: Vec<CandidateConfig>,

    pub transform: TransformConfig,

    pub feature_engineering: FeatureEngineeringConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target: "Churn".to_string(),
            positive_labels: vec!["yes".to_string(), "true".to_string()],
            identifier_columns: vec!["customerID".to_string(), "customer_id".to_string()],
            test_fraction: 0.2,
            random_seed: 42,
            threshold: 0.5,
            candidates: CandidateConfig::defaults(),
            transform: TransformConfig::default(),
            feature_engineering: FeatureEngineeringConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON file; absent fields take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| ChurnError::ConfigError(format!("{}: {}", path.display(), e)))
    }

    /// Builder method to set the target column
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Builder method to set the held-out fraction
    pub fn with_test_fraction(mut self, fraction: f64) -> Self {
        self.test_fraction = fraction;
        self
    }

    /// Builder method to set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    /// Builder method to set the labelling threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Builder method to set the identifier denylist
    pub fn with_identifier_columns(mut self, columns: Vec<String>) -> Self {
        self.identifier_columns = columns;
        self
    }

    /// Builder method to set the candidate list
    pub fn with_candidates(mut self, candidates: Vec<CandidateConfig>) -> Self {
        self.candidates = candidates;
        self
    }

    /// Builder method to set the transform options
    pub fn with_transform(mut self, transform: TransformConfig) -> Self {
        self.transform = transform;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.target.trim().is_empty() {
            return Err(ChurnError::ConfigError("target must not be empty".to_string()));
        }
        if self.positive_labels.is_empty() {
            return Err(ChurnError::ConfigError(
                "positive_labels must name at least one value".to_string(),
            ));
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(ChurnError::InvalidSplitConfiguration(format!(
                "test_fraction must be in (0, 1), got {}",
                self.test_fraction
            )));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ChurnError::ConfigError(format!(
                "threshold must be in [0, 1], got {}",
                self.threshold
            )));
        }
        if self.candidates.is_empty() {
            return Err(ChurnError::ConfigError("at least one candidate is required".to_string()));
        }
        let mut seen = std::collections::HashSet::new();
        for candidate in &self.candidates {
            candidate.validate()?;
            if !seen.insert(candidate.name.as_str()) {
                return Err(ChurnError::ConfigError(format!(
                    "duplicate candidate name '{}'",
                    candidate.name
                )));
            }
        }
        self.feature_engineering.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.target, "Churn");
        assert_eq!(config.test_fraction, 0.2);
        assert_eq!(config.random_seed, 42);
        assert_eq!(config.threshold, 0.5);
        assert_eq!(config.candidates.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = PipelineConfig::new()
            .with_target("Exited")
            .with_test_fraction(0.3)
            .with_seed(7)
            .with_threshold(0.4);

        assert_eq!(config.target, "Exited");
        assert_eq!(config.test_fraction, 0.3);
        assert_eq!(config.random_seed, 7);
        assert_eq!(config.threshold, 0.4);
    }

    #[test]
    fn test_invalid_test_fraction() {
        let config = PipelineConfig::new().with_test_fraction(1.0);
        assert!(matches!(
            config.validate(),
            Err(ChurnError::InvalidSplitConfiguration(_))
        ));
    }

    #[test]
    fn test_duplicate_candidate_names() {
        let mut candidates = CandidateConfig::defaults();
        candidates[1].name = "logit".to_string();
        let config = PipelineConfig::new().with_candidates(candidates);
        assert!(matches!(config.validate(), Err(ChurnError::ConfigError(_))));
    }

    #[test]
    fn test_from_file_with_partial_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"random_seed": 9, "candidates": [{"name": "tree", "estimator": {"kind": "decision_tree", "max_depth": 5, "min_samples_split": 2, "min_samples_leaf": 1}}]}"#,
        )
        .unwrap();

        let config = PipelineConfig::from_file(&path).unwrap();
        assert_eq!(config.random_seed, 9);
        assert_eq!(config.candidates[0].name, "tree");
        assert_eq!(config.target, "Churn");
    }
}
