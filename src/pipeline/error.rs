//! Error types for the analysis pipeline

use thiserror::Error;

/// Failures that abort an analysis run.
///
/// Input errors (`MissingColumns`) and computation errors (`InsufficientData`,
/// `ConstantInput`, `SingularDesign`) are never recovered locally. Unparseable
/// numeric cells are not errors at all; the cleaner turns them into missing values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Required column(s) {missing:?} not found in dataset. Available columns: {available:?}")]
    MissingColumns {
        missing: Vec<String>,
        available: Vec<String>,
    },

    #[error("Insufficient data for {analysis}: need at least {required} complete-case rows, found {found}")]
    InsufficientData {
        analysis: &'static str,
        required: usize,
        found: usize,
    },

    #[error("Cannot compute {analysis}: column '{column}' has zero variance")]
    ConstantInput {
        analysis: &'static str,
        column: String,
    },

    #[error("Regression design matrix is singular (predictors are collinear, condition number {condition_number:.3e})")]
    SingularDesign { condition_number: f64 },
}
