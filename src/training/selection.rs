//! Winner selection among evaluated candidates

use super::engine::{CandidateRun, CandidateScores, EvaluationResult};
use super::models::TrainedModel;
use crate::error::{ChurnError, Result};
use tracing::info;

/// The chosen candidate, already fitted
#[derive(Debug, Clone)]
pub struct SelectedModel {
    pub name: String,
    pub model: TrainedModel,
    pub scores: CandidateScores,
}

/// Pick the candidate with the highest ROC-AUC.
///
/// Failed candidates are skipped. Ties keep the earliest candidate in
/// declaration order. Returns the winner and every evaluation record.
pub fn select_best(runs: Vec<CandidateRun>) -> Result<(SelectedModel, Vec<EvaluationResult>)> {
    let attempted = runs.len();
    let mut results = Vec::with_capacity(attempted);
    let mut best: Option<SelectedModel> = None;

    for run in runs {
        if let (Some(scores), Some(model)) = (run.result.scores(), run.model) {
            let better = best
                .as_ref()
                .map_or(true, |current| scores.roc_auc > current.scores.roc_auc);
            if better {
                best = Some(SelectedModel {
                    name: run.result.name.clone(),
                    model,
                    scores: scores.clone(),
                });
            }
        }
        results.push(run.result);
    }

    let winner = best.ok_or(ChurnError::NoViableModel { attempted })?;
    info!(
        candidate = %winner.name,
        roc_auc = winner.scores.roc_auc,
        pr_auc = winner.scores.pr_auc,
        "Selected model"
    );
    Ok((winner, results))
}
