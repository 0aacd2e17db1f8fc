//! churnpipe - Leakage-safe churn modelling
//!
//! This crate turns a tabular customer export into a selected churn model and
//! a scored dataset:
//! - Feature preparation (numeric coercion, engagement signals, proxy labels)
//! - Leakage-aware column classification and a fitted feature transform
//! - Stratified splitting and competing candidate estimators
//! - Selection by held-out ROC-AUC and batch scoring
//!
//! # Modules
//!
//! - [`feature_engineering`] - The prepare stage
//! - [`preprocessing`] - Column roles, label encoding, imputation, scaling, encoding
//! - [`training`] - Splitting, estimators, metrics and selection
//! - [`inference`] - Persisted pipelines and batch scoring
//! - [`pipeline`] - End-to-end orchestration
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Core ML modules
pub mod preprocessing;
pub mod training;
pub mod inference;

// Data processing
pub mod feature_engineering;
pub mod pipeline;

// Utilities
pub mod utils;

// Services
pub mod cli;

pub use error::{ChurnError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{ChurnError, Result};

    // Feature engineering
    pub use crate::feature_engineering::{FeatureEngineer, FeatureEngineeringConfig, PreparedDataset, ProxyLabelConfig};

    // Preprocessing
    pub use crate::preprocessing::{ColumnClassifier, ColumnRole, ColumnRoles, FeatureTransform, TransformConfig};

    // Training
    pub use crate::training::{
        CandidateConfig, ClassificationReport, Estimator, EstimatorConfig, EvaluationResult, TrainEngine,
        TrainedModel,
    };

    // Inference
    pub use crate::inference::{ScoredTable, Scorer, ScoringConfig, TrainedPipeline};

    // Orchestration
    pub use crate::pipeline::{ChurnPipeline, PipelineConfig, PipelineOutcome};

    // I/O
    pub use crate::utils::{DataLoader, DataSaver};
}
