//! The persisted model artifact: fitted transform plus fitted estimator

use crate::error::{ChurnError, Result};
use crate::preprocessing::FeatureTransform;
use crate::training::{CandidateScores, Estimator, TrainedModel};
use chrono::{DateTime, Utc};
use ndarray::Array1;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Immutable, reloadable scoring pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedPipeline {
    version: String,
    candidate_name: String,
    target: String,
    positive_labels: Vec<String>,
    threshold: f64,
    transform: FeatureTransform,
    model: TrainedModel,
    scores: Option<CandidateScores>,
    trained_at: DateTime<Utc>,
}

impl TrainedPipeline {
    pub fn new(
        candidate_name: impl Into<String>,
        transform: FeatureTransform,
        model: TrainedModel,
        target: impl Into<String>,
        positive_labels: Vec<String>,
        threshold: f64,
    ) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            candidate_name: candidate_name.into(),
            target: target.into(),
            positive_labels,
            threshold,
            transform,
            model,
            scores: None,
            trained_at: Utc::now(),
        }
    }

    /// Attach the held-out scores that won the selection
    pub fn with_scores(mut self, scores: CandidateScores) -> Self {
        self.scores = Some(scores);
        self
    }

    /// Class-1 probability for every row of `df`
    pub fn predict_proba(&self, df: &DataFrame) -> Result<Array1<f64>> {
        let x = self.transform.apply(df)?;
        self.model.predict_proba(&x)
    }

    /// Apply the pipeline threshold
    pub fn label(&self, proba: f64) -> i32 {
        i32::from(proba >= self.threshold)
    }

    pub fn candidate_name(&self) -> &str {
        &self.candidate_name
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn positive_labels(&self) -> &[String] {
        &self.positive_labels
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn transform(&self) -> &FeatureTransform {
        &self.transform
    }

    pub fn model(&self) -> &TrainedModel {
        &self.model
    }

    pub fn scores(&self) -> Option<&CandidateScores> {
        self.scores.as_ref()
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Save the pipeline as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), candidate = %self.candidate_name, "Saved trained pipeline");
        Ok(())
    }

    /// Load a pipeline saved by [`TrainedPipeline::save`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let pipeline: Self = serde_json::from_str(&json).map_err(|e| {
            ChurnError::SerializationError(format!("{}: {}", path.display(), e))
        })?;
        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::{ColumnClassifier, TransformConfig};
    use crate::training::{DecisionTree, Estimator};
    use ndarray::array;

    fn pipeline() -> (TrainedPipeline, DataFrame) {
        let df = df!(
            "tenure" => &[1.0, 2.0, 30.0, 40.0],
            "Contract" => &["Month-to-month", "Month-to-month", "Two year", "One year"],
            "Churn" => &["Yes", "Yes", "No", "No"]
        )
        .unwrap();
        let roles = ColumnClassifier::new("Churn").classify(&df).unwrap();
        let transform = FeatureTransform::fit(&df, &roles, &TransformConfig::default()).unwrap();
        let x = transform.apply(&df).unwrap();

        let mut model = TrainedModel::DecisionTree(DecisionTree::new());
        model.fit(&x, &array![1.0, 1.0, 0.0, 0.0]).unwrap();

        let pipeline = TrainedPipeline::new(
            "tree",
            transform,
            model,
            "Churn",
            vec!["yes".to_string()],
            0.5,
        );
        (pipeline, df)
    }

    #[test]
    fn test_save_load_reproduces_predictions() {
        let (pipeline, df) = pipeline();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("best_model.json");

        pipeline.save(&path).unwrap();
        let restored = TrainedPipeline::load(&path).unwrap();

        assert_eq!(restored.candidate_name(), "tree");
        assert_eq!(restored.version(), env!("CARGO_PKG_VERSION"));
        assert_eq!(restored.trained_at(), pipeline.trained_at());
        assert_eq!(
            restored.predict_proba(&df).unwrap(),
            pipeline.predict_proba(&df).unwrap()
        );
    }

    #[test]
    fn test_threshold_labeling() {
        let (pipeline, _) = pipeline();
        assert_eq!(pipeline.label(0.5), 1);
        assert_eq!(pipeline.label(0.4999), 0);
    }

    #[test]
    fn test_load_garbage_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            TrainedPipeline::load(&path),
            Err(ChurnError::SerializationError(_))
        ));
    }
}
