//! Candidate estimator configuration

use super::decision_tree::DecisionTree;
use super::linear_models::LogisticRegression;
use super::models::TrainedModel;
use super::random_forest::{MaxFeatures, RandomForest};
use crate::error::{ChurnError, Result};
use serde::{Deserialize, Serialize};

/// Estimator family and hyperparameters for one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimatorConfig {
    /// L2-regularized logistic regression fit by gradient descent
    LogisticRegression {
        max_iter: usize,
        learning_rate: f64,
        alpha: f64,
        tol: f64,
    },
    /// Bagged ensemble of randomized decision trees
    RandomForest {
        n_estimators: usize,
        max_depth: Option<usize>,
        min_samples_split: usize,
        min_samples_leaf: usize,
        max_features: MaxFeatures,
    },
    /// Single CART tree
    DecisionTree {
        max_depth: Option<usize>,
        min_samples_split: usize,
        min_samples_leaf: usize,
    },
}

impl EstimatorConfig {
    /// Logistic regression with default hyperparameters
    pub fn logistic_regression() -> Self {
        EstimatorConfig::LogisticRegression {
            max_iter: 2000,
            learning_rate: 0.1,
            alpha: 0.01,
            tol: 1e-6,
        }
    }

    /// Random forest with default hyperparameters
    pub fn random_forest() -> Self {
        EstimatorConfig::RandomForest {
            n_estimators: 300,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::Sqrt,
        }
    }

    /// Build an unfitted estimator seeded with `seed`
    pub fn build(&self, seed: u64) -> TrainedModel {
        match self {
            EstimatorConfig::LogisticRegression { max_iter, learning_rate, alpha, tol } => {
                TrainedModel::LogisticRegression(
                    LogisticRegression::new()
                        .with_max_iter(*max_iter)
                        .with_learning_rate(*learning_rate)
                        .with_alpha(*alpha)
                        .with_tol(*tol),
                )
            }
            EstimatorConfig::RandomForest {
                n_estimators,
                max_depth,
                min_samples_split,
                min_samples_leaf,
                max_features,
            } => {
                let mut model = RandomForest::new(*n_estimators)
                    .with_min_samples_split(*min_samples_split)
                    .with_min_samples_leaf(*min_samples_leaf)
                    .with_max_features(*max_features)
                    .with_random_state(seed);
                if let Some(depth) = max_depth {
                    model = model.with_max_depth(*depth);
                }
                TrainedModel::RandomForest(model)
            }
            EstimatorConfig::DecisionTree { max_depth, min_samples_split, min_samples_leaf } => {
                let mut model = DecisionTree::new()
                    .with_min_samples_split(*min_samples_split)
                    .with_min_samples_leaf(*min_samples_leaf)
                    .with_random_state(seed);
                if let Some(depth) = max_depth {
                    model = model.with_max_depth(*depth);
                }
                TrainedModel::DecisionTree(model)
            }
        }
    }

    fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(ChurnError::ConfigError(msg.to_string()));
        match self {
            EstimatorConfig::LogisticRegression { max_iter, learning_rate, alpha, .. } => {
                if *max_iter == 0 {
                    return invalid("logistic_regression.max_iter must be > 0");
                }
                if !(*learning_rate > 0.0) {
                    return invalid("logistic_regression.learning_rate must be > 0");
                }
                if *alpha < 0.0 {
                    return invalid("logistic_regression.alpha must be >= 0");
                }
            }
            EstimatorConfig::RandomForest { n_estimators, min_samples_split, min_samples_leaf, .. } => {
                if *n_estimators == 0 {
                    return invalid("random_forest.n_estimators must be > 0");
                }
                if *min_samples_split < 2 || *min_samples_leaf < 1 {
                    return invalid("random_forest requires min_samples_split >= 2 and min_samples_leaf >= 1");
                }
            }
            EstimatorConfig::DecisionTree { min_samples_split, min_samples_leaf, .. } => {
                if *min_samples_split < 2 || *min_samples_leaf < 1 {
                    return invalid("decision_tree requires min_samples_split >= 2 and min_samples_leaf >= 1");
                }
            }
        }
        Ok(())
    }
}

/// A named candidate in the model competition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateConfig {
    /// Name reported in logs and persisted with the winner
    pub name: String,
    pub estimator: EstimatorConfig,
}

impl CandidateConfig {
    pub fn new(name: impl Into<String>, estimator: EstimatorConfig) -> Self {
        Self {
            name: name.into(),
            estimator,
        }
    }

    /// The default pair: `logit` then `rf`
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("logit", EstimatorConfig::logistic_regression()),
            Self::new("rf", EstimatorConfig::random_forest()),
        ]
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ChurnError::ConfigError("candidate name must not be empty".to_string()));
        }
        self.estimator.validate()
    }
}
