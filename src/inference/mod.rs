//! Inference module
//!
//! The persisted `TrainedPipeline` and batch scoring of full datasets.

mod config;
mod pipeline;
mod scorer;

pub use config::ScoringConfig;
pub use pipeline::TrainedPipeline;
pub use scorer::{score, ScoredTable, Scorer};
