//! Binary label extraction from the target column

use crate::error::Result;
use crate::utils::frame;
use ndarray::Array1;
use polars::prelude::*;

/// Encode the target column as 0/1.
///
/// A row is positive when its trimmed, lower-cased text equals one of
/// `positive_tokens` (compared case-insensitively). Everything else, missing
/// values included, is negative.
pub fn encode_labels(df: &DataFrame, target: &str, positive_tokens: &[String]) -> Result<Array1<f64>> {
    let tokens: Vec<String> = positive_tokens
        .iter()
        .map(|t| t.trim().to_lowercase())
        .collect();

    let labels = frame::text_values(df, target)?
        .into_iter()
        .map(|value| {
            let positive = value
                .map(|v| tokens.contains(&v.trim().to_lowercase()))
                .unwrap_or(false);
            if positive { 1.0 } else { 0.0 }
        })
        .collect();

    Ok(labels)
}

/// Number of (negative, positive) labels
pub fn class_counts(y: &Array1<f64>) -> (usize, usize) {
    let positive = y.iter().filter(|&&v| v > 0.5).count();
    (y.len() - positive, positive)
}
