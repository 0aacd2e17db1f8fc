//! Full-population scoring

use super::{ScoringConfig, TrainedPipeline};
use crate::error::Result;
use crate::preprocessing::encode_labels;
use crate::utils::frame;
use ndarray::Array1;
use polars::prelude::*;
use std::time::Instant;
use tracing::{info, warn};

/// Scored rows: input columns without the target, then probability,
/// thresholded label and the actual 0/1 label under the target's name
#[derive(Debug, Clone)]
pub struct ScoredTable {
    frame: DataFrame,
    positive_predictions: usize,
}

impl ScoredTable {
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Rows labelled 1 at the pipeline threshold
    pub fn positive_predictions(&self) -> usize {
        self.positive_predictions
    }
}

/// Applies a trained pipeline to whole datasets in fixed-size batches
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    config: ScoringConfig,
}

impl Scorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score every row of `df`, preserving row order and count.
    ///
    /// When `df` has no target column the actual-label column is left out.
    /// Output columns already present in `df` are replaced, so a scored
    /// table can be scored again.
    pub fn score(&self, pipeline: &TrainedPipeline, df: &DataFrame) -> Result<ScoredTable> {
        let start = Instant::now();
        let proba = self.predict_batched(pipeline, df)?;
        let labels: Vec<i32> = proba.iter().map(|&p| pipeline.label(p)).collect();
        let positive_predictions = labels.iter().filter(|&&l| l == 1).count();

        let target = pipeline.target();
        let replaced = [
            target,
            self.config.probability_column.as_str(),
            self.config.label_column.as_str(),
        ];
        let mut columns: Vec<Column> = df
            .get_columns()
            .iter()
            .filter(|c| !replaced.contains(&c.name().as_str()))
            .cloned()
            .collect();

        columns.push(Column::new(
            self.config.probability_column.as_str().into(),
            proba.to_vec(),
        ));
        columns.push(Column::new(self.config.label_column.as_str().into(), labels));

        if frame::has_column(df, target) {
            columns.push(Column::new(target.into(), actual_labels(pipeline, df)?));
        } else {
            warn!(target = %target, "Target column absent, scored output has no actual label");
        }

        let frame = DataFrame::new(columns)?;
        info!(
            rows = frame.height(),
            positive_predictions,
            threshold = pipeline.threshold(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Scored dataset"
        );

        Ok(ScoredTable {
            frame,
            positive_predictions,
        })
    }

    fn predict_batched(&self, pipeline: &TrainedPipeline, df: &DataFrame) -> Result<Array1<f64>> {
        let n_rows = df.height();
        let batch_size = self.config.batch_size.max(1);
        if n_rows <= batch_size {
            return pipeline.predict_proba(df);
        }

        let mut all_predictions = Vec::with_capacity(n_rows);
        for start in (0..n_rows).step_by(batch_size) {
            let len = batch_size.min(n_rows - start);
            let batch = df.slice(start as i64, len);
            let predictions = pipeline.predict_proba(&batch)?;
            all_predictions.extend(predictions.iter().copied());
        }

        Ok(Array1::from_vec(all_predictions))
    }
}

/// 0/1 actual label per row.
///
/// A numeric target is a label this scorer already wrote, so 1 stays 1;
/// text targets go through the pipeline's affirmative tokens.
fn actual_labels(pipeline: &TrainedPipeline, df: &DataFrame) -> Result<Vec<i32>> {
    let target = pipeline.target();
    let is_numeric = df
        .column(target)
        .map(|c| frame::is_numeric_dtype(c.dtype()))
        .unwrap_or(false);

    if is_numeric {
        Ok(frame::numeric_values(df, target)?
            .iter()
            .map(|v| i32::from(*v == Some(1.0)))
            .collect())
    } else {
        Ok(encode_labels(df, target, pipeline.positive_labels())?
            .iter()
            .map(|&v| v as i32)
            .collect())
    }
}

/// Score with the default configuration
pub fn score(pipeline: &TrainedPipeline, df: &DataFrame) -> Result<ScoredTable> {
    Scorer::default().score(pipeline, df)
}
