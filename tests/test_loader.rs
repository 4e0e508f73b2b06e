//! Tests for the subject table loader

use neurostat::pipeline::{dataset_shape, load_subject_table};
use polars::prelude::*;
use std::io::Write;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_load_csv_file() {
    let (_temp_dir, csv_path) = common::create_temp_csv(common::TWO_ROW_CSV);

    let df = load_subject_table(&csv_path).unwrap();

    common::assert_shape(&df, 2, 4);
    assert_eq!(
        common::column_names(&df),
        ["age", "education_years", "mmse", "hippocampal_volume_mm3"]
    );
}

#[test]
fn test_columns_are_loaded_as_text() {
    let (_temp_dir, csv_path) = common::create_temp_csv(common::TWO_ROW_CSV);

    let df = load_subject_table(&csv_path).unwrap();

    for column in df.get_columns() {
        assert_eq!(
            column.dtype(),
            &DataType::String,
            "Column '{}' should be read as text",
            column.name()
        );
    }
}

#[test]
fn test_malformed_cells_do_not_fail_load() {
    let (_temp_dir, csv_path) = common::create_temp_csv(common::MESSY_CSV);

    let df = load_subject_table(&csv_path).unwrap();

    common::assert_shape(&df, 6, 4);
}

#[test]
fn test_missing_file_names_the_path() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("does_not_exist.csv");

    let err = load_subject_table(&missing).unwrap_err();

    let message = err.to_string();
    assert!(message.contains("Input file not found"), "got: {}", message);
    assert!(message.contains("does_not_exist.csv"), "got: {}", message);
}

#[test]
fn test_directory_is_not_a_file() {
    let temp_dir = TempDir::new().unwrap();

    assert!(load_subject_table(temp_dir.path()).is_err());
}

#[test]
fn test_extra_columns_are_kept() {
    let (_temp_dir, csv_path) = common::create_temp_csv(common::COHORT_CSV);

    let df = load_subject_table(&csv_path).unwrap();

    common::assert_shape(&df, 12, 5);
    assert_eq!(common::column_names(&df)[0], "subject_id");
}

#[test]
fn test_dataset_shape() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("subjects.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "{}", common::HEADER).unwrap();
    for i in 0..25 {
        writeln!(file, "{},{},{},{}", 60 + i, 12, 28, 3000 + i * 10).unwrap();
    }
    drop(file);

    let df = load_subject_table(&csv_path).unwrap();
    let (rows, cols, memory_mb) = dataset_shape(&df);

    assert_eq!(rows, 25);
    assert_eq!(cols, 4);
    assert!(memory_mb >= 0.0, "Memory estimate should be non-negative");
}
