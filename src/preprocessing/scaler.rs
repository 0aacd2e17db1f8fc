//! Feature scaling without centering
//!
//! Every scaler here only divides; none subtracts a center, so zero stays zero
//! and one-hot / sparse-friendly blocks keep their structure.

use serde::{Deserialize, Serialize};

/// Type of scaler to use
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScalerType {
    /// Divide by population standard deviation: x / std
    Standard,
    /// Max absolute scaling: x / max(|x|)
    MaxAbs,
    /// No scaling
    None,
}

impl Default for ScalerType {
    fn default() -> Self {
        ScalerType::Standard
    }
}

impl ScalerType {
    /// Divisor learned from the (already imputed) fitting values.
    /// Degenerate spread yields 1.0.
    pub fn fit_scale(&self, values: &[f64]) -> f64 {
        let scale = match self {
            ScalerType::Standard => {
                if values.is_empty() {
                    return 1.0;
                }
                let n = values.len() as f64;
                let mean = values.iter().sum::<f64>() / n;
                let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
                var.sqrt()
            }
            ScalerType::MaxAbs => values.iter().fold(0.0f64, |a, b| a.max(b.abs())),
            ScalerType::None => 1.0,
        };

        if scale == 0.0 || !scale.is_finite() { 1.0 } else { scale }
    }
}
