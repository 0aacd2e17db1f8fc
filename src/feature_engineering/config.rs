//! Feature engineering configuration

use crate::error::{ChurnError, Result};
use serde::{Deserialize, Serialize};

/// Rule used to derive a churn label when the dataset has none
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyLabelConfig {
    /// Derive the label when the target column is missing
    pub enabled: bool,
    /// Contract value that qualifies as at-risk
    pub contract_value: String,
    /// Highest tenure (inclusive) that qualifies
    pub max_tenure: f64,
    /// Highest service count (inclusive) that qualifies
    pub max_service_count: u32,
}

impl Default for ProxyLabelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            contract_value: "Month-to-month".to_string(),
            max_tenure: 2.0,
            max_service_count: 2,
        }
    }
}

/// Configuration for the `prepare` stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureEngineeringConfig {
    /// Text columns coerced to numbers; unparsable values become missing
    pub numeric_columns: Vec<String>,
    /// Columns counted by `service_count` when equal to "Yes"
    pub service_columns: Vec<String>,
    /// Source of `charge_bucket`
    pub charge_column: String,
    /// Source of `tenure_bucket` and the proxy tenure rule
    pub tenure_column: String,
    /// Source of the proxy contract rule
    pub contract_column: String,
    pub proxy_label: ProxyLabelConfig,
}

impl Default for FeatureEngineeringConfig {
    fn default() -> Self {
        Self {
            numeric_columns: vec!["TotalCharges".to_string(), "tenure".to_string()],
            service_columns: [
                "PhoneService",
                "MultipleLines",
                "OnlineSecurity",
                "OnlineBackup",
                "DeviceProtection",
                "TechSupport",
                "StreamingTV",
                "StreamingMovies",
                "PaperlessBilling",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            charge_column: "MonthlyCharges".to_string(),
            tenure_column: "tenure".to_string(),
            contract_column: "Contract".to_string(),
            proxy_label: ProxyLabelConfig::default(),
        }
    }
}

impl FeatureEngineeringConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to replace the proxy label rule
    pub fn with_proxy_label(mut self, proxy_label: ProxyLabelConfig) -> Self {
        self.proxy_label = proxy_label;
        self
    }

    /// Builder method to disable proxy labelling
    pub fn without_proxy_label(mut self) -> Self {
        self.proxy_label.enabled = false;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.proxy_label.max_tenure.is_finite() {
            return Err(ChurnError::ConfigError(
                "feature_engineering.proxy_label.max_tenure must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FeatureEngineeringConfig::default();
        assert_eq!(config.service_columns.len(), 9);
        assert!(config.proxy_label.enabled);
        assert_eq!(config.proxy_label.max_service_count, 2);
    }

    #[test]
    fn test_partial_json() {
        let config: FeatureEngineeringConfig =
            serde_json::from_str(r#"{"proxy_label":{"max_tenure":6}}"#).unwrap();
        assert_eq!(config.proxy_label.max_tenure, 6.0);
        assert_eq!(config.proxy_label.contract_value, "Month-to-month");
        assert_eq!(config.charge_column, "MonthlyCharges");
    }
}
