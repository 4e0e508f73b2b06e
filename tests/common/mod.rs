//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use rand::prelude::*;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const HEADER: &str = "age,education_years,mmse,hippocampal_volume_mm3";

/// The two-subject input used for the end-to-end boundary case
pub const TWO_ROW_CSV: &str =
    "age,education_years,mmse,hippocampal_volume_mm3\n70,12,28,3200\n75,16,25,3000\n";

/// A small, clean cohort with mixed-case headers and an extra column
pub const COHORT_CSV: &str = "\
subject_id, Age ,Education_Years,MMSE,Hippocampal_Volume_mm3
s01,72,12,27,3150
s02,68,16,29,3420
s03,81,8,22,2710
s04,75,14,26,3050
s05,63,18,30,3600
s06,79,10,24,2890
s07,70,12,28,3300
s08,85,9,20,2550
s09,66,15,29,3510
s10,77,11,25,2980
s11,73,13,27,3200
s12,69,17,28,3380
";

/// Cohort with unparseable and blank cells in the required columns
pub const MESSY_CSV: &str = "\
age,education_years,mmse,hippocampal_volume_mm3
72,12,27,3150
68,16,n/a,3420
81,8,22,
75,fourteen,26,3050
63,18,30,3600
79,10,24,2890
";

/// Clean numeric subject table built in memory
pub fn create_subject_dataframe() -> DataFrame {
    df! {
        "age" => [72.0f64, 68.0, 81.0, 75.0, 63.0, 79.0],
        "education_years" => [12.0f64, 16.0, 8.0, 14.0, 18.0, 10.0],
        "mmse" => [27.0f64, 29.0, 22.0, 26.0, 30.0, 24.0],
        "hippocampal_volume_mm3" => [3150.0f64, 3420.0, 2710.0, 3050.0, 3600.0, 2890.0],
    }
    .unwrap()
}

/// Cohort following `mmse = 3 + 0.01*volume + 0.5*age - 0.2*education + noise`
///
/// Noise is uniform on `[-noise, noise]`.
pub fn create_linear_cohort(n_rows: usize, noise: f64, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut age = Vec::with_capacity(n_rows);
    let mut education = Vec::with_capacity(n_rows);
    let mut volume = Vec::with_capacity(n_rows);
    let mut mmse = Vec::with_capacity(n_rows);

    for _ in 0..n_rows {
        let a = 55.0 + rng.gen::<f64>() * 35.0;
        let e = 6.0 + rng.gen::<f64>() * 14.0;
        let v = 2400.0 + rng.gen::<f64>() * 1600.0;
        let eps = (rng.gen::<f64>() * 2.0 - 1.0) * noise;

        age.push(a);
        education.push(e);
        volume.push(v);
        mmse.push(3.0 + 0.01 * v + 0.5 * a - 0.2 * e + eps);
    }

    df! {
        "age" => age,
        "education_years" => education,
        "mmse" => mmse,
        "hippocampal_volume_mm3" => volume,
    }
    .unwrap()
}

/// Create a temporary directory holding `contents` as a CSV file
pub fn create_temp_csv(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("subjects.csv");
    std::fs::write(&csv_path, contents).unwrap();
    (temp_dir, csv_path)
}

/// Create a project root with `contents` at the default input location
pub fn create_project(contents: &str) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("data").join("sample");
    std::fs::create_dir_all(&data_dir).unwrap();
    std::fs::write(data_dir.join("sample_neuro_data.csv"), contents).unwrap();
    temp_dir
}

pub fn summary_path(root: &Path) -> PathBuf {
    root.join("outputs/tables/stats_summary.txt")
}

pub fn plot_path(root: &Path) -> PathBuf {
    root.join("outputs/figures/scatter_mmse_vs_volume.png")
}

/// Column names as owned strings
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|s| s.to_string()).collect()
}

/// Read a Float64 column as options
pub fn f64_values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

/// Assert two floats agree within `tol`
pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "Expected {} within {} of {}, diff {}",
        actual,
        tol,
        expected,
        (actual - expected).abs()
    );
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}
