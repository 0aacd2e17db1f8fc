//! Feature engineering module
//!
//! The `prepare` stage that turns a raw account export into a modelling table:
//! - Numeric coercion of text columns such as `TotalCharges`
//! - `<col>_bin` companions for yes/no columns
//! - `service_count`, `charge_bucket` and `tenure_bucket` engagement signals
//! - An optional rule-based churn label when the export has no target

mod config;
pub mod engagement;
pub mod proxy_label;

pub use config::{FeatureEngineeringConfig, ProxyLabelConfig};

use crate::error::Result;
use crate::utils::frame;
use polars::prelude::*;
use tracing::{debug, info};

/// Output of the prepare stage
#[derive(Debug, Clone)]
pub struct PreparedDataset {
    pub frame: DataFrame,
    /// Columns appended to the input, in order
    pub added_columns: Vec<String>,
    /// Whether the target column was derived by the proxy rule
    pub proxy_label_applied: bool,
}

/// Derives engagement signals and, if needed, a proxy churn label
#[derive(Debug, Clone)]
pub struct FeatureEngineer {
    config: FeatureEngineeringConfig,
    target: String,
}

impl FeatureEngineer {
    pub fn new(config: FeatureEngineeringConfig, target: impl Into<String>) -> Self {
        Self {
            config,
            target: target.into(),
        }
    }

    pub fn prepare(&self, mut df: DataFrame) -> Result<PreparedDataset> {
        let mut added_columns = Vec::new();

        for name in &self.config.numeric_columns {
            if frame::has_column(&df, name) {
                let values = frame::numeric_values(&df, name)?;
                df.with_column(Column::new(name.as_str().into(), values))?;
                debug!(column = %name, "Coerced to numeric");
            }
        }

        for name in engagement::yes_no_columns(&df)? {
            let col = engagement::binary_column(&df, &name)?;
            added_columns.push(col.name().to_string());
            df.with_column(col)?;
        }

        let service_columns: Vec<&str> = self
            .config
            .service_columns
            .iter()
            .map(String::as_str)
            .filter(|name| frame::has_column(&df, name))
            .collect();
        let service_counts = if service_columns.is_empty() {
            None
        } else {
            let counts = engagement::service_count(&df, &service_columns)?;
            df.with_column(Column::new("service_count".into(), counts.clone()))?;
            added_columns.push("service_count".to_string());
            Some(counts)
        };

        if frame::has_column(&df, &self.config.charge_column) {
            let charges = frame::numeric_values(&df, &self.config.charge_column)?;
            let buckets = engagement::tercile_labels(&charges, ["Low", "Mid", "High"]);
            df.with_column(Column::new("charge_bucket".into(), buckets))?;
            added_columns.push("charge_bucket".to_string());
        }

        let tenure = &self.config.tenure_column;
        if frame::has_column(&df, tenure) {
            let values = frame::numeric_values(&df, tenure)?;
            let filled: Vec<Option<f64>> = values.iter().map(|v| Some(v.unwrap_or(0.0))).collect();
            let buckets = engagement::tercile_labels(&filled, ["New", "Established", "Loyal"]);
            df.with_column(Column::new(tenure.as_str().into(), values))?;
            df.with_column(Column::new("tenure_bucket".into(), buckets))?;
            added_columns.push("tenure_bucket".to_string());
        }

        let mut proxy_label_applied = false;
        if !frame::has_column(&df, &self.target) && self.config.proxy_label.enabled {
            let labels = proxy_label::proxy_labels(
                &df,
                &self.config.proxy_label,
                &self.config.contract_column,
                tenure,
                service_counts.as_deref(),
            )?;
            let positives = labels.iter().filter(|&&l| l == "Yes").count();
            df.with_column(Column::new(self.target.as_str().into(), labels))?;
            added_columns.push(self.target.clone());
            proxy_label_applied = true;
            info!(target = %self.target, positives, rows = df.height(), "Derived proxy churn label");
        }

        info!(
            rows = df.height(),
            columns = df.width(),
            added = added_columns.len(),
            "Prepared dataset"
        );

        Ok(PreparedDataset {
            frame: df,
            added_columns,
            proxy_label_applied,
        })
    }
}
