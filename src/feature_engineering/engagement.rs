//! Engagement signals derived from raw account columns

use crate::error::Result;
use crate::utils::frame;
use polars::prelude::*;

const YES_NO_VALUES: [&str; 6] = ["Yes", "No", "yes", "no", "True", "False"];

/// Text columns whose observed values are all yes/no style tokens
pub fn yes_no_columns(df: &DataFrame) -> Result<Vec<String>> {
    let mut columns = Vec::new();
    for col in df.get_columns() {
        if col.dtype() != &DataType::String {
            continue;
        }
        let all_yes_no = col
            .str()?
            .into_iter()
            .flatten()
            .all(|v| YES_NO_VALUES.contains(&v));
        if all_yes_no {
            columns.push(col.name().to_string());
        }
    }
    Ok(columns)
}

/// `yes`/`true` → 1, `no`/`false` → 0, anything else missing
pub fn yes_no_flag(value: &str) -> Option<i64> {
    match value.trim().to_lowercase().as_str() {
        "yes" | "true" => Some(1),
        "no" | "false" => Some(0),
        _ => None,
    }
}

/// 0/1 companion column for a yes/no column
pub fn binary_column(df: &DataFrame, name: &str) -> Result<Column> {
    let flags: Vec<Option<i64>> = frame::text_values(df, name)?
        .iter()
        .map(|v| v.as_deref().and_then(yes_no_flag))
        .collect();
    Ok(Column::new(format!("{}_bin", name).into(), flags))
}

/// Per-row count of `service_columns` equal to "Yes"
pub fn service_count(df: &DataFrame, service_columns: &[&str]) -> Result<Vec<u32>> {
    let mut counts = vec![0u32; df.height()];
    for name in service_columns {
        for (count, value) in counts.iter_mut().zip(frame::text_values(df, name)?) {
            if value.as_deref() == Some("Yes") {
                *count += 1;
            }
        }
    }
    Ok(counts)
}

/// Quantile with linear interpolation between order statistics
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Assign each value to one of three equal-frequency bins.
///
/// Bin edges are the 1/3 and 2/3 quantiles of the observed values; a value
/// on an edge belongs to the lower bin. Missing values stay missing.
pub fn tercile_labels(values: &[Option<f64>], labels: [&str; 3]) -> Vec<Option<String>> {
    let mut observed: Vec<f64> = values.iter().flatten().copied().collect();
    observed.sort_by(|a, b| a.total_cmp(b));

    let (Some(first_edge), Some(second_edge)) = (quantile(&observed, 1.0 / 3.0), quantile(&observed, 2.0 / 3.0)) else {
        return vec![None; values.len()];
    };

    values
        .iter()
        .map(|v| {
            v.map(|x| {
                let label = if x <= first_edge {
                    labels[0]
                } else if x <= second_edge {
                    labels[1]
                } else {
                    labels[2]
                };
                label.to_string()
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yes_no_detection() {
        let df = df!(
            "Partner" => &[Some("Yes"), Some("No"), None],
            "Contract" => &[Some("One year"), Some("Two year"), Some("One year")],
            "Churn" => &[Some("True"), Some("False"), Some("True")],
            "tenure" => &[Some(1i64), Some(2), Some(3)]
        )
        .unwrap();
        assert_eq!(yes_no_columns(&df).unwrap(), vec!["Partner", "Churn"]);
    }

    #[test]
    fn test_binary_column_keeps_missing() {
        let df = df!("Partner" => &[Some("Yes"), Some("no"), None]).unwrap();
        let col = binary_column(&df, "Partner").unwrap();
        assert_eq!(col.name().as_str(), "Partner_bin");
        let values: Vec<Option<i64>> = col.i64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1), Some(0), None]);
    }

    #[test]
    fn test_service_count() {
        let df = df!(
            "PhoneService" => &["Yes", "No", "Yes"],
            "TechSupport" => &["Yes", "No internet service", "No"]
        )
        .unwrap();
        assert_eq!(service_count(&df, &["PhoneService", "TechSupport"]).unwrap(), vec![2, 0, 1]);
    }

    #[test]
    fn test_quantile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.5), Some(2.5));
        assert_eq!(quantile(&sorted, 1.0), Some(4.0));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn test_tercile_labels() {
        let values: Vec<Option<f64>> = (1..=6).map(|v| Some(v as f64)).chain([None]).collect();
        let labels = tercile_labels(&values, ["Low", "Mid", "High"]);
        let labels: Vec<Option<&str>> = labels.iter().map(|l| l.as_deref()).collect();
        assert_eq!(
            labels,
            vec![
                Some("Low"),
                Some("Low"),
                Some("Mid"),
                Some("Mid"),
                Some("High"),
                Some("High"),
                None
            ]
        );
    }
}
