//! Integration tests for data processing: loading, preparing and saving exports

use churnpipe::feature_engineering::{FeatureEngineer, FeatureEngineeringConfig, ProxyLabelConfig};
use churnpipe::utils::{frame, DataLoader, DataSaver};
use polars::prelude::*;
use std::path::Path;

const TELCO_CSV: &str = "\
customerID,gender,tenure,PhoneService,InternetService,OnlineSecurity,TechSupport,StreamingTV,Contract,MonthlyCharges,TotalCharges,Churn
7590-VHVEG,Female,1,No,DSL,No,No,No,Month-to-month,29.85,29.85,No
5575-GNVDE,Male,34,Yes,DSL,Yes,No,No,One year,56.95,1889.5,No
3668-QPYBK,Male,2,Yes,DSL,Yes,No,No,Month-to-month,53.85,108.15,Yes
7795-CFOCW,Male,45,No,DSL,Yes,Yes,No,One year,42.30,1840.75,No
9237-HQITU,Female,0,Yes,Fiber optic,No,No,No,Month-to-month,70.70, ,Yes
9305-CDSKC,Female,8,Yes,Fiber optic,No,No,Yes,Month-to-month,99.65,820.5,Yes
";

fn write_export(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("telco.csv");
    std::fs::write(&path, contents).unwrap();
    path
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_blank_total_charges_loads_as_text() {
    let dir = tempfile::tempdir().unwrap();
    let df = DataLoader::new().load_csv(write_export(dir.path(), TELCO_CSV)).unwrap();

    assert_eq!(df.height(), 6);
    assert_eq!(df.width(), 12);
    assert_eq!(df.column("TotalCharges").unwrap().dtype(), &DataType::String);
    assert!(frame::is_coercible_numeric(&df, "TotalCharges").unwrap());
}

// ============================================================================
// Prepare stage
// ============================================================================

#[test]
fn test_prepare_coerces_and_derives() {
    let dir = tempfile::tempdir().unwrap();
    let df = DataLoader::new().load_csv(write_export(dir.path(), TELCO_CSV)).unwrap();

    let prepared = FeatureEngineer::new(FeatureEngineeringConfig::default(), "Churn")
        .prepare(df)
        .unwrap();
    let out = &prepared.frame;

    assert!(!prepared.proxy_label_applied);
    assert_eq!(out.column("TotalCharges").unwrap().dtype(), &DataType::Float64);
    assert_eq!(frame::numeric_values(out, "TotalCharges").unwrap()[4], None);

    // InternetService holds "DSL"/"Fiber optic" so it gets no _bin companion
    assert!(frame::has_column(out, "PhoneService_bin"));
    assert!(frame::has_column(out, "Churn_bin"));
    assert!(!frame::has_column(out, "InternetService_bin"));

    let services = frame::numeric_values(out, "service_count").unwrap();
    assert_eq!(
        services,
        vec![Some(0.0), Some(2.0), Some(2.0), Some(2.0), Some(1.0), Some(2.0)]
    );

    let tenure_buckets = frame::text_values(out, "tenure_bucket").unwrap();
    assert_eq!(tenure_buckets[3].as_deref(), Some("Loyal"));
    assert_eq!(tenure_buckets[4].as_deref(), Some("New"));
}

#[test]
fn test_prepare_without_target_derives_proxy_label() {
    let dir = tempfile::tempdir().unwrap();
    let mut df = DataLoader::new().load_csv(write_export(dir.path(), TELCO_CSV)).unwrap();
    let _ = df.drop_in_place("Churn").unwrap();

    let config = FeatureEngineeringConfig::default().with_proxy_label(ProxyLabelConfig {
        max_service_count: 3,
        ..ProxyLabelConfig::default()
    });
    let prepared = FeatureEngineer::new(config, "Churn").prepare(df).unwrap();

    assert!(prepared.proxy_label_applied);
    let churn = frame::text_values(&prepared.frame, "Churn").unwrap();
    let churn: Vec<&str> = churn.iter().map(|v| v.as_deref().unwrap_or("")).collect();
    assert_eq!(churn, vec!["Yes", "No", "Yes", "No", "Yes", "No"]);
}

// ============================================================================
// Saving
// ============================================================================

#[test]
fn test_prepared_table_round_trips_through_csv() {
    let dir = tempfile::tempdir().unwrap();
    let df = DataLoader::new().load_csv(write_export(dir.path(), TELCO_CSV)).unwrap();
    let mut prepared = FeatureEngineer::new(FeatureEngineeringConfig::default(), "Churn")
        .prepare(df)
        .unwrap()
        .frame;

    let out_path = dir.path().join("prepared").join("telco_prepared.csv");
    DataSaver::save_csv(&mut prepared, &out_path).unwrap();

    let reloaded = DataLoader::new().load_auto(&out_path).unwrap();
    assert_eq!(reloaded.height(), prepared.height());
    assert_eq!(frame::column_names(&reloaded), frame::column_names(&prepared));
    assert!(frame::is_coercible_numeric(&reloaded, "TotalCharges").unwrap());
}
