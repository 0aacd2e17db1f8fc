//! Rule-based churn label for datasets that ship without one

use super::config::ProxyLabelConfig;
use crate::error::Result;
use crate::utils::frame;
use polars::prelude::*;

/// Per-row "Yes"/"No" under the proxy rule.
///
/// A row is "Yes" when its contract equals the configured value, its tenure is
/// at most `max_tenure` and its service count is at most `max_service_count`.
/// An absent column falls back to a month-to-month contract, zero tenure or
/// zero services; a missing value in a present column fails its condition.
pub fn proxy_labels(
    df: &DataFrame,
    config: &ProxyLabelConfig,
    contract_column: &str,
    tenure_column: &str,
    service_counts: Option<&[u32]>,
) -> Result<Vec<&'static str>> {
    let n = df.height();

    let contract_ok: Vec<bool> = if frame::has_column(df, contract_column) {
        frame::text_values(df, contract_column)?
            .iter()
            .map(|v| v.as_deref() == Some(config.contract_value.as_str()))
            .collect()
    } else {
        vec!["Month-to-month" == config.contract_value; n]
    };

    let tenure_ok: Vec<bool> = if frame::has_column(df, tenure_column) {
        frame::numeric_values(df, tenure_column)?
            .iter()
            .map(|v| v.map_or(false, |t| t <= config.max_tenure))
            .collect()
    } else {
        vec![0.0 <= config.max_tenure; n]
    };

    let labels = (0..n)
        .map(|i| {
            let services = service_counts.map_or(0, |counts| counts[i]);
            if contract_ok[i] && tenure_ok[i] && services <= config.max_service_count {
                "Yes"
            } else {
                "No"
            }
        })
        .collect();

    Ok(labels)
}
