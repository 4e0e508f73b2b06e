//! Plain-text statistics summary: correlation line followed by the OLS report

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use crate::pipeline::{CorrelationResult, OlsFit};

/// Width of the OLS report blocks
const REPORT_WIDTH: usize = 78;

/// Condition numbers above this get a multicollinearity note
const LARGE_CONDITION_NUMBER: f64 = 1000.0;

/// One-line correlation summary with r to 3 and p to 4 decimals
pub fn format_correlation_line(result: &CorrelationResult) -> String {
    format!(
        "Correlation hippocampal volume vs MMSE: r={:.3}, p={:.4}",
        result.r, result.p_value
    )
}

/// Header line naming the model formula, e.g.
/// `Linear regression: MMSE ~ hippocampal_volume_mm3 + age + education_years`
pub fn regression_header(fit: &OlsFit) -> String {
    let formula = fit.formula();
    let terms = formula.split_once(" ~ ").map(|(_, t)| t).unwrap_or("");
    format!(
        "Linear regression: {} ~ {}",
        fit.response.to_uppercase(),
        terms
    )
}

/// Create (or truncate) the summary file and write the correlation line
pub fn write_correlation_summary(path: &Path, result: &CorrelationResult) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create summary file: {}", path.display()))?;
    writeln!(file, "{}", format_correlation_line(result))
        .with_context(|| format!("Failed to write summary file: {}", path.display()))?;
    Ok(())
}

/// Append the regression header and full OLS report to the summary file
pub fn append_regression_summary(path: &Path, fit: &OlsFit) -> Result<()> {
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .with_context(|| format!("Failed to open summary file: {}", path.display()))?;

    write!(
        file,
        "\n{}\n\n{}",
        regression_header(fit),
        render_ols_summary(fit)
    )
    .with_context(|| format!("Failed to append to summary file: {}", path.display()))?;

    Ok(())
}

/// Render the OLS report stamped with the current local time
pub fn render_ols_summary(fit: &OlsFit) -> String {
    render_ols_summary_at(fit, Local::now())
}

/// Render the OLS report: model block, coefficient table, residual diagnostics, notes
pub fn render_ols_summary_at(fit: &OlsFit, timestamp: DateTime<Local>) -> String {
    let name_width = fit
        .coefficients
        .iter()
        .map(|c| c.name.len())
        .max()
        .unwrap_or(0)
        .max(10)
        + 2;
    let table_width = name_width + 4 * 11 + 2 * 12;
    let width = table_width.max(REPORT_WIDTH);

    let heavy = "=".repeat(width);
    let light = "-".repeat(width);
    let mut out = String::new();

    out.push_str(&format!("{:^width$}\n", "OLS Regression Results", width = width));
    out.push_str(&heavy);
    out.push('\n');

    let rows = [
        ("Dep. Variable:", fit.response.clone(), "R-squared:", fmt_fixed(fit.r_squared, 3)),
        ("Model:", "OLS".to_string(), "Adj. R-squared:", fmt_fixed(fit.adj_r_squared, 3)),
        ("Method:", "Least Squares".to_string(), "F-statistic:", fmt_general(fit.f_statistic)),
        (
            "Date:",
            timestamp.format("%a, %d %b %Y").to_string(),
            "Prob (F-statistic):",
            fmt_general(fit.f_p_value),
        ),
        (
            "Time:",
            timestamp.format("%H:%M:%S").to_string(),
            "Log-Likelihood:",
            fmt_general(fit.log_likelihood),
        ),
        ("No. Observations:", fit.nobs.to_string(), "AIC:", fmt_general(fit.aic)),
        ("Df Residuals:", fit.df_resid.to_string(), "BIC:", fmt_general(fit.bic)),
        ("Df Model:", fit.df_model.to_string(), "", String::new()),
        ("Covariance Type:", "nonrobust".to_string(), "", String::new()),
    ];
    for (left_label, left_value, right_label, right_value) in &rows {
        out.push_str(&key_value_row(left_label, left_value, right_label, right_value));
    }

    out.push_str(&heavy);
    out.push('\n');
    out.push_str(&format!(
        "{:<name_width$} {:>10} {:>10} {:>10} {:>10} {:>11} {:>11}\n",
        "",
        "coef",
        "std err",
        "t",
        "P>|t|",
        "[0.025",
        "0.975]",
        name_width = name_width
    ));
    out.push_str(&light);
    out.push('\n');
    for c in &fit.coefficients {
        out.push_str(&format!(
            "{:<name_width$} {:>10} {:>10} {:>10} {:>10} {:>11} {:>11}\n",
            c.name,
            fmt_cell(c.estimate, 4, 10),
            fmt_cell(c.std_error, 3, 10),
            fmt_cell(c.t_statistic, 3, 10),
            fmt_cell(c.p_value, 3, 10),
            fmt_cell(c.conf_low, 3, 11),
            fmt_cell(c.conf_high, 3, 11),
            name_width = name_width
        ));
    }

    let d = &fit.diagnostics;
    out.push_str(&heavy);
    out.push('\n');
    let diagnostics = [
        ("Omnibus:", fmt_fixed(d.omnibus, 3), "Durbin-Watson:", fmt_fixed(d.durbin_watson, 3)),
        (
            "Prob(Omnibus):",
            fmt_fixed(d.omnibus_p_value, 3),
            "Jarque-Bera (JB):",
            fmt_fixed(d.jarque_bera, 3),
        ),
        ("Skew:", fmt_fixed(d.skew, 3), "Prob(JB):", fmt_general(d.jarque_bera_p_value)),
        ("Kurtosis:", fmt_fixed(d.kurtosis, 3), "Cond. No.", fmt_general(fit.condition_number)),
    ];
    for (left_label, left_value, right_label, right_value) in &diagnostics {
        out.push_str(&key_value_row(left_label, left_value, right_label, right_value));
    }
    out.push_str(&heavy);
    out.push('\n');

    out.push_str("\nNotes:\n");
    out.push_str(
        "[1] Standard Errors assume that the covariance matrix of the errors is correctly specified.\n",
    );
    if fit.condition_number > LARGE_CONDITION_NUMBER {
        out.push_str(&format!(
            "[2] The condition number is large, {}. This might indicate that there are\nstrong multicollinearity or other numerical problems.\n",
            fmt_scientific(fit.condition_number)
        ));
    }

    out
}

/// Two label/value pairs on one 78-column line
fn key_value_row(left_label: &str, left_value: &str, right_label: &str, right_value: &str) -> String {
    let line = format!(
        "{:<20}{:>18}   {:<20}{:>17}",
        left_label, left_value, right_label, right_value
    );
    format!("{}\n", line.trim_end())
}

/// Fixed decimals; non-finite values print as `nan` / `inf` / `-inf`
pub fn fmt_fixed(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        let text = if value > 0.0 { "inf" } else { "-inf" };
        text.to_string()
    } else {
        format!("{:.*}", decimals, value)
    }
}

/// Fixed decimals when the value fits in `width` columns, otherwise [`fmt_general`]
fn fmt_cell(value: f64, decimals: usize, width: usize) -> String {
    let fixed = fmt_fixed(value, decimals);
    if fixed.len() <= width {
        fixed
    } else {
        fmt_general(value)
    }
}

/// Four significant digits, switching to scientific notation for very small or large values
pub fn fmt_general(value: f64) -> String {
    if !value.is_finite() {
        return fmt_fixed(value, 0);
    }
    if value == 0.0 {
        return "0.000".to_string();
    }

    let magnitude = value.abs().log10().floor() as i32;
    if !(-4..6).contains(&magnitude) {
        fmt_scientific(value)
    } else {
        let decimals = (3 - magnitude).max(0) as usize;
        format!("{:.*}", decimals, value)
    }
}

/// Scientific notation with a two-digit signed exponent, e.g. `4.56e+04`
pub fn fmt_scientific(value: f64) -> String {
    if !value.is_finite() {
        return fmt_fixed(value, 0);
    }
    if value == 0.0 {
        return "0.00e+00".to_string();
    }

    let mut exponent = value.abs().log10().floor() as i32;
    let mut mantissa = value / 10f64.powi(exponent);
    // Rounding can push the mantissa to 10.00
    if format!("{:.2}", mantissa.abs()) == "10.00" {
        exponent += 1;
        mantissa = value / 10f64.powi(exponent);
    }
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{:.2}e{}{:02}", mantissa, sign, exponent.abs())
}
