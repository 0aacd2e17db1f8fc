//! Integration test: Column roles and the fitted feature transform

use churnpipe::error::ChurnError;
use churnpipe::preprocessing::{
    encode_labels, ColumnClassifier, ColumnRole, ExclusionReason, FeatureTransform, ImputeStrategy, ScalerType,
    TransformConfig,
};
use churnpipe::utils::frame;
use polars::prelude::*;

fn telco_df() -> DataFrame {
    df!(
        "customerID" => &["7590-VHVEG", "5575-GNVDE", "3668-QPYBK", "7795-CFOCW", "9237-HQITU", "9305-CDSKC"],
        "tenure" => &[1i64, 34, 2, 45, 2, 8],
        "MonthlyCharges" => &[29.85, 56.95, 53.85, 42.30, 70.70, 99.65],
        "TotalCharges" => &[Some("29.85"), Some("1889.5"), Some(" "), Some("1840.75"), Some("151.65"), Some("820.5")],
        "Contract" => &[Some("Month-to-month"), Some("One year"), Some("Month-to-month"), None, Some("Month-to-month"), Some("Month-to-month")],
        "ChurnScore" => &[80i64, 10, 75, 5, 90, 85],
        "Churn" => &["No", "No", "Yes", "No", "Yes", "Yes"]
    )
    .unwrap()
}

#[test]
fn test_roles_keep_leaks_and_ids_out() {
    let df = telco_df();
    let roles = ColumnClassifier::new("Churn")
        .with_identifier_columns(&["customerID".to_string()])
        .classify(&df)
        .unwrap();

    assert_eq!(roles.numeric_columns(), vec!["tenure", "MonthlyCharges", "TotalCharges"]);
    assert_eq!(roles.categorical_columns(), vec!["Contract"]);
    assert_eq!(
        roles.role("ChurnScore"),
        Some(ColumnRole::Excluded(ExclusionReason::TargetLeak))
    );
    assert_eq!(roles.excluded_columns(), vec!["customerID", "ChurnScore", "Churn"]);
    assert_eq!(roles.feature_count(), 4);
}

#[test]
fn test_missing_target_column() {
    let df = telco_df().drop("Churn").unwrap();
    let result = ColumnClassifier::new("Churn").classify(&df);
    assert!(matches!(result, Err(ChurnError::MissingTargetColumn { column }) if column == "Churn"));
}

#[test]
fn test_labels_are_case_insensitive() {
    let df = df!("Churn" => &[Some("YES"), Some(" yes "), Some("No"), None, Some("True")]).unwrap();
    let tokens = vec!["yes".to_string(), "true".to_string()];
    let y = encode_labels(&df, "Churn", &tokens).unwrap();
    assert_eq!(y.to_vec(), vec![1.0, 1.0, 0.0, 0.0, 1.0]);
}

#[test]
fn test_transform_learns_only_from_fitting_rows() {
    let df = telco_df();
    let roles = ColumnClassifier::new("Churn")
        .with_identifier_columns(&["customerID".to_string()])
        .classify(&df)
        .unwrap();

    let fit_rows = frame::take_rows(&df, &[0, 1, 2]).unwrap();
    let other_rows = frame::take_rows(&df, &[3, 4, 5]).unwrap();
    let config = TransformConfig::default();

    let transform = FeatureTransform::fit(&fit_rows, &roles, &config).unwrap();
    let refit_with_more = FeatureTransform::fit(&df, &roles, &config).unwrap();
    assert_ne!(transform, refit_with_more);

    // median of the two observed TotalCharges in the fitting rows
    let total = transform
        .numeric_features()
        .iter()
        .find(|f| f.name == "TotalCharges")
        .unwrap();
    assert!((total.fill_value - (29.85 + 1889.5) / 2.0).abs() < 1e-9);

    let x = transform.apply(&other_rows).unwrap();
    assert_eq!(x.dim(), (3, transform.n_features()));
    assert_eq!(
        transform.feature_names(),
        vec![
            "tenure",
            "MonthlyCharges",
            "TotalCharges",
            "Contract_Month-to-month",
            "Contract_One year"
        ]
    );
}

#[test]
fn test_missing_category_is_its_own_level() {
    let df = telco_df();
    let roles = ColumnClassifier::new("Churn").classify(&df).unwrap();
    let transform = FeatureTransform::fit(&df, &roles, &TransformConfig::default()).unwrap();

    let contract = transform
        .categorical_features()
        .iter()
        .find(|c| c.name() == "Contract")
        .unwrap();
    assert_eq!(contract.categories(), &["Month-to-month", "One year", "missing"]);
}

#[test]
fn test_scaling_never_centers() {
    let df = df!(
        "x" => &[2.0, 4.0, 6.0, 8.0],
        "Churn" => &["No", "Yes", "No", "Yes"]
    )
    .unwrap();
    let roles = ColumnClassifier::new("Churn").classify(&df).unwrap();
    let config = TransformConfig::default().with_scaler(ScalerType::MaxAbs);
    let transform = FeatureTransform::fit(&df, &roles, &config).unwrap();

    let zero = df!("x" => &[0.0]).unwrap();
    assert_eq!(transform.apply(&zero).unwrap()[[0, 0]], 0.0);
    let top = df!("x" => &[8.0]).unwrap();
    assert_eq!(transform.apply(&top).unwrap()[[0, 0]], 1.0);
}

#[test]
fn test_constant_impute_strategy() {
    let df = df!(
        "x" => &[Some(1.0), None, Some(3.0)],
        "Churn" => &["No", "Yes", "No"]
    )
    .unwrap();
    let roles = ColumnClassifier::new("Churn").classify(&df).unwrap();
    let config = TransformConfig::default()
        .with_numeric_impute(ImputeStrategy::Constant(0.0))
        .with_scaler(ScalerType::None);
    let transform = FeatureTransform::fit(&df, &roles, &config).unwrap();

    let x = transform.apply(&df).unwrap();
    assert_eq!(x.column(0).to_vec(), vec![1.0, 0.0, 3.0]);
}
