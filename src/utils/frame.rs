//! Typed access to data frame columns
//!
//! All numeric work in the crate goes through these helpers so that coercion
//! rules (blank text is missing, NaN is missing, numeric text parses) live in
//! one place.

use crate::error::{ChurnError, Result};
use polars::prelude::*;

/// Check if dtype is numeric
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Parse a text cell as a number; blank or unparsable text is `None`
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
}

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name)
        .map_err(|_| ChurnError::FeatureNotFound(name.to_string()))
}

/// Column values coerced to numbers
pub fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let col = column(df, name)?;

    if is_numeric_dtype(col.dtype()) {
        let casted = col.cast(&DataType::Float64)?;
        let values = casted
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Ok(values)
    } else {
        let casted = col.cast(&DataType::String)?;
        let values = casted
            .str()?
            .into_iter()
            .map(|v| v.and_then(parse_number))
            .collect();
        Ok(values)
    }
}

/// Column values rendered as text; blank text is `None`
pub fn text_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let col = column(df, name)?;
    let casted = col.cast(&DataType::String)?;
    let values = casted
        .str()?
        .into_iter()
        .map(|v| {
            v.and_then(|s| {
                if s.trim().is_empty() {
                    None
                } else {
                    Some(s.to_string())
                }
            })
        })
        .collect();
    Ok(values)
}

/// Whether every non-missing value of the column is a number after coercion
pub fn is_coercible_numeric(df: &DataFrame, name: &str) -> Result<bool> {
    let col = column(df, name)?;
    let dtype = col.dtype();

    if is_numeric_dtype(dtype) {
        return Ok(true);
    }
    if !matches!(dtype, DataType::String | DataType::Null) {
        return Ok(false);
    }

    let casted = col.cast(&DataType::String)?;
    let all_numeric = casted
        .str()?
        .into_iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .all(|s| parse_number(s).is_some());
    Ok(all_numeric)
}

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}

/// Column names in frame order
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

/// Rows of `df` at `indices`, in the given order
pub fn take_rows(df: &DataFrame, indices: &[usize]) -> Result<DataFrame> {
    let idx: Vec<IdxSize> = indices.iter().map(|&i| i as IdxSize).collect();
    let idx = IdxCa::from_vec("row_idx".into(), idx);
    Ok(df.take(&idx)?)
}
