//! Feature transform configuration

use super::{ImputeStrategy, ScalerType};
use serde::{Deserialize, Serialize};

/// Configuration for the feature transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Strategy for handling missing numeric values
    pub numeric_impute_strategy: ImputeStrategy,

    /// Scaler applied to numeric features after imputation
    pub scaler_type: ScalerType,

    /// Category substituted for missing categorical values
    pub missing_category: String,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            numeric_impute_strategy: ImputeStrategy::Median,
            scaler_type: ScalerType::Standard,
            missing_category: "missing".to_string(),
        }
    }
}

impl TransformConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set numeric impute strategy
    pub fn with_numeric_impute(mut self, strategy: ImputeStrategy) -> Self {
        self.numeric_impute_strategy = strategy;
        self
    }

    /// Builder method to set scaler type
    pub fn with_scaler(mut self, scaler_type: ScalerType) -> Self {
        self.scaler_type = scaler_type;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TransformConfig::default();
        assert_eq!(config.numeric_impute_strategy, ImputeStrategy::Median);
        assert_eq!(config.scaler_type, ScalerType::Standard);
        assert_eq!(config.missing_category, "missing");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TransformConfig = serde_json::from_str(r#"{"scaler_type":"MaxAbs"}"#).unwrap();
        assert_eq!(config.scaler_type, ScalerType::MaxAbs);
        assert_eq!(config.missing_category, "missing");
    }
}
