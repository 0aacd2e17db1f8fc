//! Candidate training and held-out evaluation

use super::config::CandidateConfig;
use super::metrics::{average_precision, roc_auc, ClassificationReport};
use super::models::{Estimator, TrainedModel};
use crate::error::{ChurnError, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Held-out scores for a candidate that trained successfully
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScores {
    pub roc_auc: f64,
    pub pr_auc: f64,
    pub report: ClassificationReport,
    pub training_time_secs: f64,
}

/// Outcome of one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EvaluationOutcome {
    Evaluated(CandidateScores),
    Failed { reason: String },
}

/// Per-candidate evaluation record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub name: String,
    pub outcome: EvaluationOutcome,
}

impl EvaluationResult {
    pub fn scores(&self) -> Option<&CandidateScores> {
        match &self.outcome {
            EvaluationOutcome::Evaluated(scores) => Some(scores),
            EvaluationOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, EvaluationOutcome::Failed { .. })
    }
}

/// Evaluation record plus the fitted model, when fitting succeeded
#[derive(Debug, Clone)]
pub struct CandidateRun {
    pub result: EvaluationResult,
    pub model: Option<TrainedModel>,
}

/// Fits every candidate on one training partition and scores it on one
/// test partition
#[derive(Debug, Clone)]
pub struct TrainEngine {
    candidates: Vec<CandidateConfig>,
    seed: u64,
    report_threshold: f64,
}

impl TrainEngine {
    /// Create a new training engine
    pub fn new(candidates: Vec<CandidateConfig>) -> Self {
        Self {
            candidates,
            seed: 42,
            report_threshold: 0.5,
        }
    }

    /// Seed passed to every randomized estimator
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Threshold used for the classification report
    pub fn with_report_threshold(mut self, threshold: f64) -> Self {
        self.report_threshold = threshold;
        self
    }

    pub fn candidates(&self) -> &[CandidateConfig] {
        &self.candidates
    }

    /// Train and score all candidates in declaration order.
    ///
    /// A failing candidate is recorded as `Failed` and does not stop the
    /// others.
    pub fn evaluate(
        &self,
        x_train: &Array2<f64>,
        y_train: &Array1<f64>,
        x_test: &Array2<f64>,
        y_test: &Array1<f64>,
    ) -> Vec<CandidateRun> {
        info!(
            candidates = self.candidates.len(),
            train_rows = x_train.nrows(),
            test_rows = x_test.nrows(),
            n_features = x_train.ncols(),
            "Evaluating candidates"
        );

        self.candidates
            .iter()
            .map(|candidate| {
                match self.evaluate_candidate(candidate, x_train, y_train, x_test, y_test) {
                    Ok((model, scores)) => {
                        info!(
                            candidate = %candidate.name,
                            roc_auc = scores.roc_auc,
                            pr_auc = scores.pr_auc,
                            training_time_secs = scores.training_time_secs,
                            "Candidate evaluated"
                        );
                        info!(candidate = %candidate.name, "Classification report\n{}", scores.report);
                        CandidateRun {
                            result: EvaluationResult {
                                name: candidate.name.clone(),
                                outcome: EvaluationOutcome::Evaluated(scores),
                            },
                            model: Some(model),
                        }
                    }
                    Err(e) => {
                        warn!(candidate = %candidate.name, error = %e, "Candidate failed, skipping");
                        CandidateRun {
                            result: EvaluationResult {
                                name: candidate.name.clone(),
                                outcome: EvaluationOutcome::Failed { reason: e.to_string() },
                            },
                            model: None,
                        }
                    }
                }
            })
            .collect()
    }

    fn evaluate_candidate(
        &self,
        candidate: &CandidateConfig,
        x_train: &Array2<f64>,
        y_train: &Array1<f64>,
        x_test: &Array2<f64>,
        y_test: &Array1<f64>,
    ) -> Result<(TrainedModel, CandidateScores)> {
        let start = Instant::now();
        let mut model = candidate.estimator.build(self.seed);
        model.fit(x_train, y_train)?;
        let training_time_secs = start.elapsed().as_secs_f64();

        let proba = model.predict_proba(x_test)?;
        if proba.len() != y_test.len() {
            return Err(ChurnError::ShapeError {
                expected: format!("{} predictions", y_test.len()),
                actual: format!("{} predictions", proba.len()),
            });
        }
        debug!(candidate = %candidate.name, family = model.family(), "Predicted test partition");

        let scores = CandidateScores {
            roc_auc: roc_auc(y_test, &proba)?,
            pr_auc: average_precision(y_test, &proba)?,
            report: ClassificationReport::from_probabilities(y_test, &proba, self.report_threshold)?,
            training_time_secs,
        };
        Ok((model, scores))
    }
}
