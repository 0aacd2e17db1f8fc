//! Estimator trait and the persisted model enum

use super::decision_tree::DecisionTree;
use super::linear_models::LogisticRegression;
use super::random_forest::RandomForest;
use crate::error::Result;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// A binary classifier that can compete as a candidate
pub trait Estimator: Send + Sync {
    /// Fit to a feature matrix and 0/1 labels
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()>;

    /// Probability of class 1 for each row
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>>;
}

/// Enum to hold trained model variants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TrainedModel {
    LogisticRegression(LogisticRegression),
    RandomForest(RandomForest),
    DecisionTree(DecisionTree),
}

impl TrainedModel {
    /// Family name for reports
    pub fn family(&self) -> &'static str {
        match self {
            TrainedModel::LogisticRegression(_) => "logistic_regression",
            TrainedModel::RandomForest(_) => "random_forest",
            TrainedModel::DecisionTree(_) => "decision_tree",
        }
    }

    /// Per-feature importances, where the family defines them
    pub fn feature_importances(&self) -> Option<Array1<f64>> {
        match self {
            TrainedModel::LogisticRegression(m) => {
                m.coefficients.as_ref().map(|c| c.mapv(f64::abs))
            }
            TrainedModel::RandomForest(m) => m.feature_importances().cloned(),
            TrainedModel::DecisionTree(m) => m.feature_importances().cloned(),
        }
    }

    fn as_estimator(&self) -> &dyn Estimator {
        match self {
            TrainedModel::LogisticRegression(m) => m,
            TrainedModel::RandomForest(m) => m,
            TrainedModel::DecisionTree(m) => m,
        }
    }

    fn as_estimator_mut(&mut self) -> &mut dyn Estimator {
        match self {
            TrainedModel::LogisticRegression(m) => m,
            TrainedModel::RandomForest(m) => m,
            TrainedModel::DecisionTree(m) => m,
        }
    }
}

impl Estimator for TrainedModel {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        self.as_estimator_mut().fit(x, y)
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.as_estimator().predict_proba(x)
    }
}
