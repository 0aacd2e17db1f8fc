//! Column role assignment
//!
//! The classifier runs once, before any numeric work, and turns an untyped
//! table into an explicit schema: which column is the label, which columns are
//! numeric or categorical features, and which are kept out of the model.
//! Downstream stages only ever consume [`ColumnRoles`].

use crate::error::{ChurnError, Result};
use crate::utils::frame;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Why a column was kept out of the feature set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExclusionReason {
    /// Name contains the target's name (a renamed or derived copy of the label)
    TargetLeak,
    /// Listed in the identifier denylist
    Identifier,
}

/// Role of a single column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnRole {
    Target,
    Numeric,
    Categorical,
    Excluded(ExclusionReason),
}

impl ColumnRole {
    /// Whether the column feeds the feature matrix
    pub fn is_feature(&self) -> bool {
        matches!(self, ColumnRole::Numeric | ColumnRole::Categorical)
    }
}

/// Role assignment for every column of a dataset, in column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRoles {
    target: String,
    assignments: Vec<(String, ColumnRole)>,
}

impl ColumnRoles {
    /// Name of the label column
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Role of `name`, if the column was present at classification time
    pub fn role(&self, name: &str) -> Option<ColumnRole> {
        self.assignments
            .iter()
            .find(|(col, _)| col == name)
            .map(|(_, role)| *role)
    }

    /// All assignments in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, ColumnRole)> {
        self.assignments.iter().map(|(name, role)| (name.as_str(), *role))
    }

    pub fn numeric_columns(&self) -> Vec<&str> {
        self.with_role(|role| role == ColumnRole::Numeric)
    }

    pub fn categorical_columns(&self) -> Vec<&str> {
        self.with_role(|role| role == ColumnRole::Categorical)
    }

    /// Columns kept out of the model, the target included
    pub fn excluded_columns(&self) -> Vec<&str> {
        self.with_role(|role| !role.is_feature())
    }

    pub fn feature_count(&self) -> usize {
        self.assignments.iter().filter(|(_, role)| role.is_feature()).count()
    }

    fn with_role(&self, pred: impl Fn(ColumnRole) -> bool) -> Vec<&str> {
        self.assignments
            .iter()
            .filter(|(_, role)| pred(*role))
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Partitions columns into numeric, categorical and excluded sets
#[derive(Debug, Clone)]
pub struct ColumnClassifier {
    target: String,
    identifier_columns: Vec<String>,
}

impl ColumnClassifier {
    /// Create a classifier for the given label column
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            identifier_columns: Vec::new(),
        }
    }

    /// Set the identifier denylist (matched case-insensitively)
    pub fn with_identifier_columns(mut self, columns: &[String]) -> Self {
        self.identifier_columns = columns.to_vec();
        self
    }

    /// Assign a role to every column of `df`
    pub fn classify(&self, df: &DataFrame) -> Result<ColumnRoles> {
        let names = frame::column_names(df);
        if !names.iter().any(|n| n == &self.target) {
            return Err(ChurnError::MissingTargetColumn {
                column: self.target.clone(),
            });
        }

        let target_lower = self.target.to_lowercase();
        let mut assignments = Vec::with_capacity(names.len());

        for name in names {
            let lower = name.to_lowercase();
            let role = if name == self.target {
                ColumnRole::Target
            } else if self.identifier_columns.iter().any(|id| id.to_lowercase() == lower) {
                ColumnRole::Excluded(ExclusionReason::Identifier)
            } else if lower.contains(&target_lower) {
                ColumnRole::Excluded(ExclusionReason::TargetLeak)
            } else if frame::is_coercible_numeric(df, &name)? {
                ColumnRole::Numeric
            } else {
                ColumnRole::Categorical
            };
            debug!(column = %name, role = ?role, "Classified column");
            assignments.push((name, role));
        }

        let roles = ColumnRoles {
            target: self.target.clone(),
            assignments,
        };

        info!(
            numeric = roles.numeric_columns().len(),
            categorical = roles.categorical_columns().len(),
            excluded = ?roles.excluded_columns(),
            "Column roles assigned"
        );
        Ok(roles)
    }
}
