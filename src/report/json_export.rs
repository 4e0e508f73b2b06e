//! Optional JSON export of the correlation and regression results

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{CorrelationResult, OlsFit};

/// Metadata about the analysis run
#[derive(Serialize)]
pub struct ExportMetadata {
    /// Timestamp of the export (RFC 3339)
    pub timestamp: String,
    pub neurostat_version: String,
    pub input_file: String,
    /// Rows in the subject table after cleaning
    pub rows: usize,
    /// Total cells coerced to missing during cleaning
    pub cells_coerced_to_missing: usize,
}

/// Complete results export
#[derive(Serialize)]
pub struct StatsExport<'a> {
    pub metadata: ExportMetadata,
    pub correlation: &'a CorrelationResult,
    /// Absent when the regression could not be fitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regression: Option<&'a OlsFit>,
}

/// Parameters for the JSON export metadata
pub struct ExportParams<'a> {
    pub input_file: &'a Path,
    pub rows: usize,
    pub cells_coerced_to_missing: usize,
}

/// Build the export structure without writing it
pub fn build_export<'a>(
    correlation: &'a CorrelationResult,
    regression: Option<&'a OlsFit>,
    params: &ExportParams,
) -> StatsExport<'a> {
    StatsExport {
        metadata: ExportMetadata {
            timestamp: Utc::now().to_rfc3339(),
            neurostat_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: params.input_file.display().to_string(),
            rows: params.rows,
            cells_coerced_to_missing: params.cells_coerced_to_missing,
        },
        correlation,
        regression,
    }
}

/// Write the results as pretty-printed JSON to `output_path`
pub fn export_stats_json(
    correlation: &CorrelationResult,
    regression: Option<&OlsFit>,
    output_path: &Path,
    params: &ExportParams,
) -> Result<()> {
    let export = build_export(correlation, regression, params);

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize analysis results to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON file: {}", output_path.display()))?;

    Ok(())
}
