//! Missing value analysis and complete-case extraction

use anyhow::{Context, Result};
use polars::prelude::*;

/// Analyze missing values in the named columns.
///
/// Returns `(column, missing_ratio)` sorted by missing ratio descending.
/// Columns must already be numeric (see [`super::clean_subject_table`]).
pub fn analyze_missing_values(df: &DataFrame, columns: &[&str]) -> Result<Vec<(String, f64)>> {
    // Handle empty DataFrame
    if df.height() == 0 {
        return Ok(Vec::new());
    }

    let rows = df.height() as f64;
    let mut missing_ratios: Vec<(String, f64)> = Vec::with_capacity(columns.len());

    for name in columns {
        let null_count = numeric_column(df, name)?
            .iter()
            .filter(|v| v.is_none())
            .count();
        missing_ratios.push((name.to_string(), null_count as f64 / rows));
    }

    // Sort by missing ratio descending
    missing_ratios.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    Ok(missing_ratios)
}

/// Read a numeric column as nullable values; NaN counts as missing
pub fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df
        .column(name)
        .with_context(|| format!("Column '{}' not found", name))?
        .cast(&DataType::Float64)
        .with_context(|| format!("Column '{}' is not numeric", name))?;

    let values = column
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();

    Ok(values)
}

/// Rows where every named column is present.
///
/// Each returned row holds the values in the order of `columns`.
pub fn complete_cases(df: &DataFrame, columns: &[&str]) -> Result<Vec<Vec<f64>>> {
    let extracted: Vec<Vec<Option<f64>>> = columns
        .iter()
        .map(|name| numeric_column(df, name))
        .collect::<Result<_>>()?;

    let rows = (0..df.height())
        .filter_map(|i| extracted.iter().map(|col| col[i]).collect::<Option<Vec<f64>>>())
        .collect();

    Ok(rows)
}
