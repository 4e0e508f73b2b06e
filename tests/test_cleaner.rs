//! Tests for column normalization and numeric coercion

use neurostat::pipeline::{clean_subject_table, load_subject_table, AnalysisError, REQUIRED_COLUMNS};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_clean_numeric_table_keeps_values() {
    let (_temp_dir, csv_path) = common::create_temp_csv(common::TWO_ROW_CSV);
    let df = load_subject_table(&csv_path).unwrap();

    let (cleaned, report) = clean_subject_table(df).unwrap();

    common::assert_shape(&cleaned, 2, 4);
    assert_eq!(report.total_coerced(), 0);
    assert!(report.renamed.is_empty());
    assert_eq!(common::f64_values(&cleaned, "age"), vec![Some(70.0), Some(75.0)]);
    assert_eq!(
        common::f64_values(&cleaned, "education_years"),
        vec![Some(12.0), Some(16.0)]
    );
    assert_eq!(common::f64_values(&cleaned, "mmse"), vec![Some(28.0), Some(25.0)]);
    assert_eq!(
        common::f64_values(&cleaned, "hippocampal_volume_mm3"),
        vec![Some(3200.0), Some(3000.0)]
    );
}

#[test]
fn test_column_names_are_normalized_in_place() {
    let (_temp_dir, csv_path) = common::create_temp_csv(common::COHORT_CSV);
    let df = load_subject_table(&csv_path).unwrap();

    let (cleaned, report) = clean_subject_table(df).unwrap();

    assert_eq!(
        common::column_names(&cleaned),
        ["subject_id", "age", "education_years", "mmse", "hippocampal_volume_mm3"]
    );
    assert_eq!(report.renamed.len(), 4);
    assert!(report
        .renamed
        .contains(&(" Age ".to_string(), "age".to_string())));
}

#[test]
fn test_unrelated_columns_are_untouched() {
    let (_temp_dir, csv_path) = common::create_temp_csv(common::COHORT_CSV);
    let df = load_subject_table(&csv_path).unwrap();

    let (cleaned, _) = clean_subject_table(df).unwrap();

    let ids = cleaned.column("subject_id").unwrap();
    assert_eq!(ids.dtype(), &DataType::String);
    assert_eq!(ids.str().unwrap().get(0), Some("s01"));
}

#[test]
fn test_unparseable_cells_become_missing() {
    let (_temp_dir, csv_path) = common::create_temp_csv(common::MESSY_CSV);
    let df = load_subject_table(&csv_path).unwrap();

    let (cleaned, report) = clean_subject_table(df).unwrap();

    common::assert_shape(&cleaned, 6, 4);
    assert_eq!(
        common::f64_values(&cleaned, "mmse"),
        vec![Some(27.0), None, Some(22.0), Some(26.0), Some(30.0), Some(24.0)]
    );
    assert_eq!(
        common::f64_values(&cleaned, "education_years"),
        vec![Some(12.0), Some(16.0), Some(8.0), None, Some(18.0), Some(10.0)]
    );
    // Blank volume cell is missing, not coerced
    assert_eq!(common::f64_values(&cleaned, "hippocampal_volume_mm3")[2], None);

    // Other cells in the affected rows are untouched
    assert_eq!(common::f64_values(&cleaned, "age")[1], Some(68.0));
    assert_eq!(common::f64_values(&cleaned, "hippocampal_volume_mm3")[3], Some(3050.0));

    assert_eq!(report.total_coerced(), 2);
    assert!(report
        .coerced_to_missing
        .contains(&("mmse".to_string(), 1)));
    assert!(report
        .coerced_to_missing
        .contains(&("hippocampal_volume_mm3".to_string(), 0)));
}

#[test]
fn test_required_columns_are_float64() {
    let (_temp_dir, csv_path) = common::create_temp_csv(common::MESSY_CSV);
    let df = load_subject_table(&csv_path).unwrap();

    let (cleaned, _) = clean_subject_table(df).unwrap();

    for name in REQUIRED_COLUMNS {
        assert_eq!(cleaned.column(name).unwrap().dtype(), &DataType::Float64);
    }
}

#[test]
fn test_native_numeric_columns_are_accepted() {
    let df = df! {
        "AGE" => [70i64, 75],
        "education_years" => [12i32, 16],
        "mmse" => [28.0f64, 25.0],
        "hippocampal_volume_mm3" => [Some(3200.0f64), None],
    }
    .unwrap();

    let (cleaned, report) = clean_subject_table(df).unwrap();

    assert_eq!(common::f64_values(&cleaned, "age"), vec![Some(70.0), Some(75.0)]);
    assert_eq!(
        common::f64_values(&cleaned, "hippocampal_volume_mm3"),
        vec![Some(3200.0), None]
    );
    assert_eq!(report.total_coerced(), 0);
}

#[test]
fn test_missing_required_column_is_an_error() {
    let df = df! {
        "age" => ["70"],
        "mmse" => ["28"],
        "hippocampal_volume_mm3" => ["3200"],
    }
    .unwrap();

    let err = clean_subject_table(df).unwrap_err();

    match err.downcast_ref::<AnalysisError>() {
        Some(AnalysisError::MissingColumns { missing, available }) => {
            assert_eq!(missing, &vec!["education_years".to_string()]);
            assert_eq!(available.len(), 3);
        }
        other => panic!("Expected MissingColumns, got {:?}", other),
    }
}

#[test]
fn test_duplicate_names_after_normalization_fail() {
    let df = df! {
        "MMSE" => ["28"],
        "mmse" => ["27"],
        "age" => ["70"],
        "education_years" => ["12"],
        "hippocampal_volume_mm3" => ["3200"],
    }
    .unwrap();

    assert!(clean_subject_table(df).is_err());
}
