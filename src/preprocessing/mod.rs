//! Data preprocessing module
//!
//! Provides the leakage-aware schema pass and the feature transform:
//! - Column role assignment (target, numeric, categorical, excluded)
//! - Binary label extraction
//! - Median imputation and non-centering scaling for numeric columns
//! - Constant imputation and one-hot encoding for categorical columns

mod config;
mod imputer;
mod scaler;
mod encoder;
mod pipeline;
pub mod columns;
pub mod labels;

pub use config::TransformConfig;
pub use imputer::{ImputeStrategy, median};
pub use scaler::ScalerType;
pub use encoder::OneHotColumn;
pub use pipeline::{FeatureTransform, NumericFeature};
pub use columns::{ColumnClassifier, ColumnRole, ColumnRoles, ExclusionReason};
pub use labels::{class_counts, encode_labels};
