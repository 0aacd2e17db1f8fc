//! End-to-end churn pipeline
//!
//! classify columns → encode labels → stratified split → fit transform on the
//! training rows → evaluate candidates → select → score the full dataset.
//! `ChurnPipeline::run` performs no I/O, so a failed run leaves nothing behind;
//! `write_outputs` persists a successful run.

mod config;

pub use config::PipelineConfig;

use crate::error::{ChurnError, Result};
use crate::inference::{ScoredTable, Scorer, ScoringConfig, TrainedPipeline};
use crate::preprocessing::{class_counts, encode_labels, ColumnClassifier, ColumnRoles, FeatureTransform};
use crate::training::{select_best, stratified_train_test_split, EvaluationResult, TrainEngine, TrainTestSplit};
use crate::utils::{frame, DataSaver};
use ndarray::{Array1, Axis};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// File name of the persisted pipeline
pub const MODEL_FILE_NAME: &str = "best_model.json";

/// File name of the scored dataset
pub const SCORED_FILE_NAME: &str = "churn_scored.csv";

/// Everything a successful run produced
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub roles: ColumnRoles,
    pub split: TrainTestSplit,
    pub results: Vec<EvaluationResult>,
    pub pipeline: TrainedPipeline,
    pub scored: ScoredTable,
    pub elapsed_secs: f64,
}

impl PipelineOutcome {
    pub fn selected_name(&self) -> &str {
        self.pipeline.candidate_name()
    }
}

/// Paths written by [`ChurnPipeline::write_outputs`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenOutputs {
    pub model_path: PathBuf,
    pub scored_path: PathBuf,
}

/// Runs training, selection and scoring for one dataset
#[derive(Debug, Clone)]
pub struct ChurnPipeline {
    config: PipelineConfig,
    scoring: ScoringConfig,
}

impl ChurnPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            scoring: ScoringConfig::default(),
        }
    }

    /// Builder method to set the scoring options
    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Column roles under this configuration
    pub fn classify(&self, df: &DataFrame) -> Result<ColumnRoles> {
        ColumnClassifier::new(&self.config.target)
            .with_identifier_columns(&self.config.identifier_columns)
            .classify(df)
    }

    pub fn run(&self, df: &DataFrame) -> Result<PipelineOutcome> {
        let start = Instant::now();
        let config = &self.config;
        config.validate()?;

        let roles = self.classify(df)?;
        ensure_encodable(df, &roles)?;

        let y = encode_labels(df, &config.target, &config.positive_labels)?;
        let (negatives, positives) = class_counts(&y);
        info!(rows = df.height(), negatives, positives, "Encoded labels");
        if negatives == 0 || positives == 0 {
            return Err(ChurnError::InvalidSplitConfiguration(format!(
                "label column '{}' has a single class ({} negative, {} positive)",
                config.target, negatives, positives
            )));
        }

        let split = stratified_train_test_split(&y, config.test_fraction, config.random_seed)?;
        info!(train_rows = split.n_train(), test_rows = split.n_test(), seed = config.random_seed, "Split dataset");

        let train_df = frame::take_rows(df, &split.train_indices)?;
        let test_df = frame::take_rows(df, &split.test_indices)?;
        let y_train: Array1<f64> = y.select(Axis(0), &split.train_indices);
        let y_test: Array1<f64> = y.select(Axis(0), &split.test_indices);

        let transform = FeatureTransform::fit(&train_df, &roles, &config.transform)?;
        let x_train = transform.apply(&train_df)?;
        let x_test = transform.apply(&test_df)?;
        info!(
            n_features = transform.n_features(),
            dropped = ?transform.dropped_columns(),
            "Fitted feature transform"
        );

        let engine = TrainEngine::new(config.candidates.clone()).with_seed(config.random_seed);
        let runs = engine.evaluate(&x_train, &y_train, &x_test, &y_test);
        let (selected, results) = select_best(runs)?;

        let pipeline = TrainedPipeline::new(
            selected.name,
            transform,
            selected.model,
            config.target.clone(),
            config.positive_labels.clone(),
            config.threshold,
        )
        .with_scores(selected.scores);

        let scored = Scorer::new(self.scoring.clone()).score(&pipeline, df)?;

        let elapsed_secs = start.elapsed().as_secs_f64();
        info!(
            candidate = %pipeline.candidate_name(),
            scored_rows = scored.height(),
            elapsed_secs,
            "Pipeline finished"
        );

        Ok(PipelineOutcome {
            roles,
            split,
            results,
            pipeline,
            scored,
            elapsed_secs,
        })
    }

    /// Persist the selected pipeline and the scored dataset under `output_dir`
    pub fn write_outputs(outcome: &PipelineOutcome, output_dir: impl AsRef<Path>) -> Result<WrittenOutputs> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)?;

        let model_path = output_dir.join(MODEL_FILE_NAME);
        let scored_path = output_dir.join(SCORED_FILE_NAME);

        outcome.pipeline.save(&model_path)?;
        let mut scored = outcome.scored.frame().clone();
        DataSaver::save_csv(&mut scored, &scored_path)?;

        Ok(WrittenOutputs {
            model_path,
            scored_path,
        })
    }
}

/// Fail early when no column can contribute a feature.
///
/// Numeric columns without a single observed value cannot be imputed in any
/// training subset, so a dataset with only such columns is rejected before
/// splitting.
fn ensure_encodable(df: &DataFrame, roles: &ColumnRoles) -> Result<()> {
    if !roles.categorical_columns().is_empty() {
        return Ok(());
    }
    let numeric = roles.numeric_columns();
    for name in &numeric {
        if frame::numeric_values(df, name)?.iter().any(Option::is_some) {
            return Ok(());
        }
    }
    Err(ChurnError::EmptyFeatureSet {
        detail: if numeric.is_empty() {
            "no numeric or categorical columns after classification".to_string()
        } else {
            format!("numeric columns {:?} have no observed values", numeric)
        },
    })
}
