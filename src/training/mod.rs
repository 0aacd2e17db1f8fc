//! Model training module
//!
//! Candidate estimators compete on one stratified split:
//! - Logistic regression, decision tree and random forest behind `Estimator`
//! - ROC-AUC, average precision and a classification report per candidate
//! - Selection by ROC-AUC, first-declared candidate on ties

mod config;
mod engine;
mod models;
mod selection;
pub mod decision_tree;
pub mod linear_models;
pub mod metrics;
pub mod random_forest;
pub mod split;

pub use config::{CandidateConfig, EstimatorConfig};
pub use engine::{CandidateRun, CandidateScores, EvaluationOutcome, EvaluationResult, TrainEngine};
pub use models::{Estimator, TrainedModel};
pub use selection::{select_best, SelectedModel};
pub use decision_tree::{DecisionTree, TreeNode};
pub use linear_models::LogisticRegression;
pub use metrics::{average_precision, roc_auc, ClassMetrics, ClassificationReport, ConfusionMatrix};
pub use random_forest::{MaxFeatures, RandomForest};
pub use split::{stratified_train_test_split, TrainTestSplit};
