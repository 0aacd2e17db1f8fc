//! Column-wise feature transform
//!
//! `FeatureTransform::fit` learns every statistic from the fitting rows and
//! returns an immutable value; `apply` is a pure function of that value and its
//! input rows. The output matrix is the numeric block (impute → scale)
//! followed by the one-hot block (impute → encode), in classification order.

use super::{
    columns::ColumnRoles,
    config::TransformConfig,
    encoder::OneHotColumn,
};
use crate::error::{ChurnError, Result};
use crate::utils::frame;
use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

/// Frozen state for one numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericFeature {
    pub name: String,
    pub fill_value: f64,
    pub scale: f64,
}

/// Fitted feature transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTransform {
    numeric: Vec<NumericFeature>,
    categorical: Vec<OneHotColumn>,
    missing_category: String,
    /// Numeric columns with no observed value in the fitting rows
    dropped_columns: Vec<String>,
}

impl FeatureTransform {
    /// Learn imputation, scaling and encoding state from `df`
    pub fn fit(df: &DataFrame, roles: &ColumnRoles, config: &TransformConfig) -> Result<Self> {
        let start = Instant::now();
        let numeric_columns = roles.numeric_columns();
        let categorical_columns = roles.categorical_columns();

        if numeric_columns.is_empty() && categorical_columns.is_empty() {
            return Err(ChurnError::EmptyFeatureSet {
                detail: "no numeric or categorical columns after classification".to_string(),
            });
        }

        let mut numeric = Vec::with_capacity(numeric_columns.len());
        let mut dropped_columns = Vec::new();

        for name in numeric_columns {
            let values = frame::numeric_values(df, name)?;
            let observed: Vec<f64> = values.iter().flatten().copied().collect();

            let fill_value = match config.numeric_impute_strategy.fill_value(&observed) {
                Some(v) => v,
                None => {
                    warn!(column = %name, "Column has no observed values in fitting rows, dropping");
                    dropped_columns.push(name.to_string());
                    continue;
                }
            };

            let imputed: Vec<f64> = values.iter().map(|v| v.unwrap_or(fill_value)).collect();
            let scale = config.scaler_type.fit_scale(&imputed);

            numeric.push(NumericFeature {
                name: name.to_string(),
                fill_value,
                scale,
            });
        }

        let mut categorical = Vec::with_capacity(categorical_columns.len());
        for name in categorical_columns {
            let values = frame::text_values(df, name)?;
            let encoder = OneHotColumn::fit(
                name,
                values
                    .iter()
                    .map(|v| v.as_deref().unwrap_or(config.missing_category.as_str())),
            );
            categorical.push(encoder);
        }

        let transform = Self {
            numeric,
            categorical,
            missing_category: config.missing_category.clone(),
            dropped_columns,
        };

        if transform.n_features() == 0 {
            return Err(ChurnError::EmptyFeatureSet {
                detail: format!(
                    "numeric columns {:?} are entirely missing and no categorical levels were seen",
                    transform.dropped_columns
                ),
            });
        }

        debug!(
            rows = df.height(),
            numeric = transform.numeric.len(),
            categorical = transform.categorical.len(),
            n_features = transform.n_features(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Feature transform fitted"
        );
        Ok(transform)
    }

    /// Encode `df` into a feature matrix using the frozen state
    pub fn apply(&self, df: &DataFrame) -> Result<Array2<f64>> {
        let n_rows = df.height();
        let mut x = Array2::<f64>::zeros((n_rows, self.n_features()));

        for (j, feature) in self.numeric.iter().enumerate() {
            let values = frame::numeric_values(df, &feature.name)?;
            for (i, value) in values.into_iter().enumerate() {
                x[[i, j]] = value.unwrap_or(feature.fill_value) / feature.scale;
            }
        }

        let mut offset = self.numeric.len();
        for encoder in &self.categorical {
            let values = frame::text_values(df, encoder.name())?;
            for (i, value) in values.iter().enumerate() {
                let category = value.as_deref().unwrap_or(self.missing_category.as_str());
                if let Some(pos) = encoder.position(category) {
                    x[[i, offset + pos]] = 1.0;
                }
            }
            offset += encoder.width();
        }

        Ok(x)
    }

    /// Width of the encoded matrix
    pub fn n_features(&self) -> usize {
        self.numeric.len() + self.categorical.iter().map(|e| e.width()).sum::<usize>()
    }

    /// Encoded column names, in matrix order
    pub fn feature_names(&self) -> Vec<String> {
        self.numeric
            .iter()
            .map(|f| f.name.clone())
            .chain(self.categorical.iter().flat_map(|e| e.feature_names()))
            .collect()
    }

    pub fn numeric_features(&self) -> &[NumericFeature] {
        &self.numeric
    }

    pub fn categorical_features(&self) -> &[OneHotColumn] {
        &self.categorical
    }

    pub fn dropped_columns(&self) -> &[String] {
        &self.dropped_columns
    }
}
