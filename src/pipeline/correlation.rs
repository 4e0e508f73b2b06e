//! Pearson correlation with a two-sided significance test

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

use super::error::AnalysisError;
use super::missing::complete_cases;

/// Pearson correlation between two variables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationResult {
    pub x_column: String,
    pub y_column: String,
    /// Number of paired observations used
    pub n: usize,
    pub r: f64,
    pub t_statistic: f64,
    /// Two-sided p-value from Student's t with n - 2 degrees of freedom
    pub p_value: f64,
    /// Rows dropped because either value was missing
    pub excluded_rows: usize,
}

/// Compute Pearson's r and its two-sided p-value for paired samples.
///
/// Uses a single-pass Welford accumulation for numerical stability. Two
/// points always lie on a line, so n = 2 gives |r| = 1 with p = 1.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> Result<CorrelationResult> {
    pearson_named(x, y, "x", "y")
}

fn pearson_named(x: &[f64], y: &[f64], x_name: &str, y_name: &str) -> Result<CorrelationResult> {
    if x.len() != y.len() {
        anyhow::bail!(
            "Paired samples must have equal length: {} vs {}",
            x.len(),
            y.len()
        );
    }

    let n = x.len();
    if n < 2 {
        return Err(AnalysisError::InsufficientData {
            analysis: "correlation",
            required: 2,
            found: n,
        }
        .into());
    }

    let mut count = 0.0;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut m2_x = 0.0;
    let mut m2_y = 0.0;
    let mut co_moment = 0.0;

    for (&xi, &yi) in x.iter().zip(y.iter()) {
        count += 1.0;
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        mean_x += dx / count;
        mean_y += dy / count;
        m2_x += dx * (xi - mean_x);
        m2_y += dy * (yi - mean_y);
        co_moment += dx * (yi - mean_y);
    }

    if m2_x <= 0.0 {
        return Err(AnalysisError::ConstantInput {
            analysis: "correlation",
            column: x_name.to_string(),
        }
        .into());
    }
    if m2_y <= 0.0 {
        return Err(AnalysisError::ConstantInput {
            analysis: "correlation",
            column: y_name.to_string(),
        }
        .into());
    }

    let r = (co_moment / (m2_x.sqrt() * m2_y.sqrt())).clamp(-1.0, 1.0);
    let (t_statistic, p_value) = correlation_t_test(r, n)?;

    Ok(CorrelationResult {
        x_column: x_name.to_string(),
        y_column: y_name.to_string(),
        n,
        r,
        t_statistic,
        p_value,
        excluded_rows: 0,
    })
}

/// t statistic and two-sided p-value for H0: rho = 0
fn correlation_t_test(r: f64, n: usize) -> Result<(f64, f64)> {
    if n == 2 {
        return Ok((f64::NAN, 1.0));
    }

    let df = (n - 2) as f64;
    let one_minus_r2 = 1.0 - r * r;
    if one_minus_r2 <= 0.0 {
        return Ok((r.signum() * f64::INFINITY, 0.0));
    }

    let t = r * (df / one_minus_r2).sqrt();
    let dist = StudentsT::new(0.0, 1.0, df).context("Invalid degrees of freedom for t-test")?;
    let p_value = (2.0 * dist.sf(t.abs())).min(1.0);

    Ok((t, p_value))
}

/// Correlate two columns of the cleaned table over pairwise-complete rows
pub fn correlate_columns(df: &DataFrame, x_column: &str, y_column: &str) -> Result<CorrelationResult> {
    let rows = complete_cases(df, &[x_column, y_column])?;
    let (x, y): (Vec<f64>, Vec<f64>) = rows.iter().map(|row| (row[0], row[1])).unzip();

    let mut result = pearson_named(&x, &y, x_column, y_column)?;
    result.excluded_rows = df.height() - rows.len();

    Ok(result)
}
