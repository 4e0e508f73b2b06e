//! Column-name normalization and numeric coercion of the subject table

use anyhow::{Context, Result};
use polars::prelude::*;

use super::error::AnalysisError;

/// Columns that must be present (after normalization) and numeric
pub const REQUIRED_COLUMNS: [&str; 4] = ["age", "education_years", "mmse", "hippocampal_volume_mm3"];

/// What the cleaner changed in the subject table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleaningReport {
    /// (original name, normalized name) for every column whose name changed
    pub renamed: Vec<(String, String)>,
    /// Per required column: cells that held a value which could not be parsed
    pub coerced_to_missing: Vec<(String, usize)>,
}

impl CleaningReport {
    /// Total number of cells turned into missing values across required columns
    pub fn total_coerced(&self) -> usize {
        self.coerced_to_missing.iter().map(|(_, n)| n).sum()
    }
}

/// Lowercase a column name and strip surrounding whitespace
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Parse one cell as a number, or mark it missing.
///
/// Text is trimmed before parsing. Nulls, blank text, unparseable text and
/// NaN all map to `None`. Native numeric and boolean cells are converted.
pub fn coerce_cell(value: &AnyValue) -> Option<f64> {
    let parsed = match value {
        AnyValue::Null => None,
        AnyValue::String(text) => parse_numeric_text(text),
        AnyValue::StringOwned(text) => parse_numeric_text(text.as_str()),
        other => other.extract::<f64>(),
    };
    parsed.filter(|v| !v.is_nan())
}

fn parse_numeric_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// A cell that was already missing before coercion (null, blank text or NaN)
fn is_absent(value: &AnyValue) -> bool {
    match value {
        AnyValue::Null => true,
        AnyValue::String(text) => text.trim().is_empty(),
        AnyValue::StringOwned(text) => text.trim().is_empty(),
        AnyValue::Float32(v) => v.is_nan(),
        AnyValue::Float64(v) => v.is_nan(),
        _ => false,
    }
}

/// Normalize column names and coerce the required columns to nullable Float64.
///
/// Row count and column order are preserved. Columns outside
/// [`REQUIRED_COLUMNS`] keep their values and type.
pub fn clean_subject_table(mut df: DataFrame) -> Result<(DataFrame, CleaningReport)> {
    let mut report = CleaningReport::default();

    let original_names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    for name in &original_names {
        let normalized = normalize_column_name(name);
        if &normalized != name {
            df.rename(name, normalized.as_str().into())
                .with_context(|| format!("Failed to rename column '{}' to '{}'", name, normalized))?;
            report.renamed.push((name.clone(), normalized));
        }
    }

    let available: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !available.iter().any(|name| name == *required))
        .map(|required| required.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(AnalysisError::MissingColumns { missing, available }.into());
    }

    for name in REQUIRED_COLUMNS {
        let (values, coerced) = {
            let series = df.column(name)?.as_materialized_series().rechunk();
            let mut coerced = 0usize;
            let values: Vec<Option<f64>> = series
                .iter()
                .map(|value| {
                    let parsed = coerce_cell(&value);
                    if parsed.is_none() && !is_absent(&value) {
                        coerced += 1;
                    }
                    parsed
                })
                .collect();
            (values, coerced)
        };

        df.with_column(Column::new(name.into(), values))
            .with_context(|| format!("Failed to replace column '{}'", name))?;
        report.coerced_to_missing.push((name.to_string(), coerced));
    }

    Ok((df, report))
}
