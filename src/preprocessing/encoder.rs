//! One-hot encoding with a frozen category set

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One-hot encoder state for a single categorical column.
///
/// Categories are sorted at fit time and never change afterwards. A value
/// outside the known set encodes as all zeros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotColumn {
    name: String,
    categories: Vec<String>,
}

impl OneHotColumn {
    /// Learn the category set from (already imputed) fitting values
    pub fn fit<'a>(name: impl Into<String>, values: impl IntoIterator<Item = &'a str>) -> Self {
        let categories: BTreeSet<&str> = values.into_iter().collect();
        Self {
            name: name.into(),
            categories: categories.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Width of the indicator block
    pub fn width(&self) -> usize {
        self.categories.len()
    }

    /// Indicator position of `value`, `None` when unseen
    pub fn position(&self, value: &str) -> Option<usize> {
        self.categories
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
    }

    /// Output column names, `<column>_<category>`
    pub fn feature_names(&self) -> Vec<String> {
        self.categories
            .iter()
            .map(|c| format!("{}_{}", self.name, c))
            .collect()
    }
}
