//! Subject table loader for CSV files

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;

/// Load the subject table from a CSV file with a header row.
///
/// Every column is read as text (schema inference over zero rows), so a
/// malformed cell can never fail the load. Typing happens in the cleaner.
pub fn load_subject_table(path: &Path) -> Result<DataFrame> {
    if !path.is_file() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .finish()
        .with_context(|| format!("Failed to load CSV file: {}", path.display()))?
        .collect()
        .with_context(|| format!("Failed to parse CSV file: {}", path.display()))?;

    Ok(df)
}

/// Shape and estimated memory of a loaded table: (rows, columns, megabytes)
pub fn dataset_shape(df: &DataFrame) -> (usize, usize, f64) {
    let (rows, cols) = df.shape();
    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);
    (rows, cols, memory_mb)
}
