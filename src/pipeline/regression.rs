//! Ordinary least squares regression with an intercept
//!
//! Solves the normal equations through a Cholesky factorization of X'X and
//! derives the usual inference quantities from (X'X)^-1:
//!
//! 1. beta = (X'X)^-1 X'y
//! 2. Cov(beta) = s^2 (X'X)^-1 with s^2 = SSR / (n - k)
//! 3. t = beta / se, two-sided p and 95% intervals from Student's t (n - k df)
//!
//! Residual diagnostics follow the conventions of a standard OLS summary:
//! biased skew/kurtosis, D'Agostino omnibus test, Jarque-Bera and Durbin-Watson.

use anyhow::{Context, Result};
use faer::linalg::solvers::DenseSolveCore;
use faer::{Mat, Side};
use polars::prelude::*;
use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor, StudentsT};

use super::error::AnalysisError;
use super::missing::complete_cases;

/// Response of the MMSE model
pub const MMSE_RESPONSE: &str = "mmse";

/// Predictors of the MMSE model, in report order
pub const MMSE_PREDICTORS: [&str; 3] = ["hippocampal_volume_mm3", "age", "education_years"];

/// Name used for the intercept term
pub const INTERCEPT: &str = "const";

/// Minimum sample size for the omnibus normality test
const OMNIBUS_MIN_OBS: usize = 8;

/// One estimated coefficient with its inference quantities
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coefficient {
    pub name: String,
    pub estimate: f64,
    pub std_error: f64,
    pub t_statistic: f64,
    pub p_value: f64,
    /// Lower bound of the 95% confidence interval
    pub conf_low: f64,
    /// Upper bound of the 95% confidence interval
    pub conf_high: f64,
}

/// Normality and autocorrelation diagnostics of the residuals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResidualDiagnostics {
    /// D'Agostino-Pearson K^2; NaN when fewer than 8 observations
    pub omnibus: f64,
    pub omnibus_p_value: f64,
    pub durbin_watson: f64,
    pub jarque_bera: f64,
    pub jarque_bera_p_value: f64,
    pub skew: f64,
    /// Pearson kurtosis (3.0 for a normal distribution)
    pub kurtosis: f64,
}

/// A fitted OLS model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OlsFit {
    pub response: String,
    /// Intercept first, then predictors in the order given to [`fit_ols`]
    pub coefficients: Vec<Coefficient>,
    pub nobs: usize,
    pub df_model: usize,
    pub df_resid: usize,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub f_statistic: f64,
    pub f_p_value: f64,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    /// Residual variance estimate s^2
    pub scale: f64,
    /// Ratio of the largest to smallest singular value of the design matrix
    pub condition_number: f64,
    pub diagnostics: ResidualDiagnostics,
    /// Rows dropped because any model variable was missing
    pub excluded_rows: usize,
}

impl OlsFit {
    /// Look up a coefficient by term name
    pub fn coefficient(&self, name: &str) -> Option<&Coefficient> {
        self.coefficients.iter().find(|c| c.name == name)
    }

    /// Model formula, e.g. `mmse ~ hippocampal_volume_mm3 + age`
    pub fn formula(&self) -> String {
        let terms: Vec<&str> = self
            .coefficients
            .iter()
            .filter(|c| c.name != INTERCEPT)
            .map(|c| c.name.as_str())
            .collect();
        format!("{} ~ {}", self.response, terms.join(" + "))
    }
}

/// Fit `response ~ predictors` by OLS with an intercept.
///
/// `x_rows[i]` holds the predictor values of observation `i` in the order of
/// `predictors`. Requires more observations than parameters so that the
/// residual variance is defined.
pub fn fit_ols(response: &str, predictors: &[&str], y: &[f64], x_rows: &[Vec<f64>]) -> Result<OlsFit> {
    let n = y.len();
    let k = predictors.len() + 1;

    if x_rows.len() != n {
        anyhow::bail!(
            "Response has {} observations but predictors have {}",
            n,
            x_rows.len()
        );
    }
    if let Some(row) = x_rows.iter().find(|row| row.len() != predictors.len()) {
        anyhow::bail!(
            "Predictor row has {} values, expected {}",
            row.len(),
            predictors.len()
        );
    }
    if n <= k {
        return Err(AnalysisError::InsufficientData {
            analysis: "regression",
            required: k + 1,
            found: n,
        }
        .into());
    }

    let x = Mat::from_fn(n, k, |i, j| if j == 0 { 1.0 } else { x_rows[i][j - 1] });
    let y_mat = Mat::from_fn(n, 1, |i, _| y[i]);

    let (largest, smallest) = extreme_singular_values(&x)?;
    let condition_number = if smallest > 0.0 {
        largest / smallest
    } else {
        f64::INFINITY
    };
    // Numerical rank test: exactly collinear columns leave a rounding-sized
    // singular value that Cholesky alone does not reject
    if smallest <= largest * n.max(k) as f64 * f64::EPSILON {
        return Err(AnalysisError::SingularDesign { condition_number }.into());
    }

    let xtx = x.transpose() * &x;
    let llt = xtx
        .llt(Side::Lower)
        .map_err(|_| AnalysisError::SingularDesign { condition_number })?;
    let xtx_inv = llt.inverse();
    let beta_mat = &xtx_inv * (x.transpose() * &y_mat);
    let beta: Vec<f64> = (0..k).map(|j| beta_mat[(j, 0)]).collect();

    let residuals: Vec<f64> = (0..n)
        .map(|i| {
            let fitted: f64 = (0..k).map(|j| x[(i, j)] * beta[j]).sum();
            y[i] - fitted
        })
        .collect();

    let df_model = k - 1;
    let df_resid = n - k;
    let n_f = n as f64;

    let ssr: f64 = residuals.iter().map(|e| e * e).sum();
    let y_mean = y.iter().sum::<f64>() / n_f;
    let tss: f64 = y.iter().map(|v| (v - y_mean).powi(2)).sum();

    let r_squared = if tss > 0.0 { 1.0 - ssr / tss } else { f64::NAN };
    let adj_r_squared = 1.0 - (n_f - 1.0) / df_resid as f64 * (1.0 - r_squared);
    let scale = ssr / df_resid as f64;

    let t_dist = StudentsT::new(0.0, 1.0, df_resid as f64)
        .context("Invalid residual degrees of freedom")?;
    let t_crit = t_dist.inverse_cdf(0.975);

    let mut names = Vec::with_capacity(k);
    names.push(INTERCEPT);
    names.extend_from_slice(predictors);

    let coefficients = names
        .iter()
        .zip(beta.iter())
        .enumerate()
        .map(|(j, (name, &estimate))| {
            let std_error = (scale * xtx_inv[(j, j)]).max(0.0).sqrt();
            let t_statistic = estimate / std_error;
            let p_value = (2.0 * t_dist.sf(t_statistic.abs())).min(1.0);
            Coefficient {
                name: name.to_string(),
                estimate,
                std_error,
                t_statistic,
                p_value,
                conf_low: estimate - t_crit * std_error,
                conf_high: estimate + t_crit * std_error,
            }
        })
        .collect();

    let (f_statistic, f_p_value) = if df_model > 0 && tss > 0.0 {
        let f = ((tss - ssr) / df_model as f64) / scale;
        let f_dist = FisherSnedecor::new(df_model as f64, df_resid as f64)
            .context("Invalid degrees of freedom for F-test")?;
        (f, f_dist.sf(f))
    } else {
        (f64::NAN, f64::NAN)
    };

    let log_likelihood =
        -n_f / 2.0 * ((2.0 * std::f64::consts::PI).ln() + (ssr / n_f).ln() + 1.0);
    let aic = -2.0 * log_likelihood + 2.0 * k as f64;
    let bic = -2.0 * log_likelihood + n_f.ln() * k as f64;

    Ok(OlsFit {
        response: response.to_string(),
        coefficients,
        nobs: n,
        df_model,
        df_resid,
        r_squared,
        adj_r_squared,
        f_statistic,
        f_p_value,
        log_likelihood,
        aic,
        bic,
        scale,
        condition_number,
        diagnostics: residual_diagnostics(&residuals)?,
        excluded_rows: 0,
    })
}

/// Fit `mmse ~ hippocampal_volume_mm3 + age + education_years` over complete cases
pub fn fit_mmse_model(df: &DataFrame) -> Result<OlsFit> {
    let mut columns = vec![MMSE_RESPONSE];
    columns.extend_from_slice(&MMSE_PREDICTORS);

    let rows = complete_cases(df, &columns)?;
    let y: Vec<f64> = rows.iter().map(|row| row[0]).collect();
    let x_rows: Vec<Vec<f64>> = rows.iter().map(|row| row[1..].to_vec()).collect();

    let mut fit = fit_ols(MMSE_RESPONSE, &MMSE_PREDICTORS, &y, &x_rows)?;
    fit.excluded_rows = df.height() - rows.len();

    Ok(fit)
}

/// Largest and smallest singular values of the design matrix
fn extreme_singular_values(x: &Mat<f64>) -> Result<(f64, f64)> {
    let singular_values = x
        .singular_values()
        .map_err(|err| anyhow::anyhow!("SVD of the design matrix failed: {:?}", err))?;

    let largest = singular_values.first().copied().unwrap_or(0.0);
    let smallest = singular_values.last().copied().unwrap_or(0.0);

    Ok((largest, smallest))
}

/// Skew, kurtosis and normality tests of the residuals
fn residual_diagnostics(residuals: &[f64]) -> Result<ResidualDiagnostics> {
    let n = residuals.len();
    let n_f = n as f64;
    let mean = residuals.iter().sum::<f64>() / n_f;

    let central_moment = |power: i32| residuals.iter().map(|e| (e - mean).powi(power)).sum::<f64>() / n_f;
    let m2 = central_moment(2);
    let m3 = central_moment(3);
    let m4 = central_moment(4);

    let (skew, kurtosis) = if m2 > 0.0 {
        (m3 / m2.powf(1.5), m4 / (m2 * m2))
    } else {
        (f64::NAN, f64::NAN)
    };

    let chi2 = ChiSquared::new(2.0).context("Invalid chi-squared distribution")?;

    let jarque_bera = n_f / 6.0 * (skew * skew + (kurtosis - 3.0).powi(2) / 4.0);
    let jarque_bera_p_value = if jarque_bera.is_nan() {
        f64::NAN
    } else {
        chi2.sf(jarque_bera)
    };

    let sum_sq: f64 = residuals.iter().map(|e| e * e).sum();
    let sum_diff_sq: f64 = residuals.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum();
    let durbin_watson = if sum_sq > 0.0 {
        sum_diff_sq / sum_sq
    } else {
        f64::NAN
    };

    let (omnibus, omnibus_p_value) = if n >= OMNIBUS_MIN_OBS && !skew.is_nan() {
        let k2 = skew_test_z(skew, n_f).powi(2) + kurtosis_test_z(kurtosis, n_f).powi(2);
        (k2, chi2.sf(k2))
    } else {
        (f64::NAN, f64::NAN)
    };

    Ok(ResidualDiagnostics {
        omnibus,
        omnibus_p_value,
        durbin_watson,
        jarque_bera,
        jarque_bera_p_value,
        skew,
        kurtosis,
    })
}

/// D'Agostino z-score for sample skewness
fn skew_test_z(skew: f64, n: f64) -> f64 {
    let y = skew * (((n + 1.0) * (n + 3.0)) / (6.0 * (n - 2.0))).sqrt();
    let beta2 = 3.0 * (n * n + 27.0 * n - 70.0) * (n + 1.0) * (n + 3.0)
        / ((n - 2.0) * (n + 5.0) * (n + 7.0) * (n + 9.0));
    let w2 = -1.0 + (2.0 * (beta2 - 1.0)).sqrt();
    let delta = 1.0 / (0.5 * w2.ln()).sqrt();
    let alpha = (2.0 / (w2 - 1.0)).sqrt();
    delta * (y / alpha).asinh()
}

/// Anscombe-Glynn z-score for sample (Pearson) kurtosis
fn kurtosis_test_z(kurtosis: f64, n: f64) -> f64 {
    let expected = 3.0 * (n - 1.0) / (n + 1.0);
    let variance = 24.0 * n * (n - 2.0) * (n - 3.0) / ((n + 1.0) * (n + 1.0) * (n + 3.0) * (n + 5.0));
    let x = (kurtosis - expected) / variance.sqrt();
    let sqrt_beta1 = 6.0 * (n * n - 5.0 * n + 2.0) / ((n + 7.0) * (n + 9.0))
        * ((6.0 * (n + 3.0) * (n + 5.0)) / (n * (n - 2.0) * (n - 3.0))).sqrt();
    let a = 6.0 + 8.0 / sqrt_beta1 * (2.0 / sqrt_beta1 + (1.0 + 4.0 / (sqrt_beta1 * sqrt_beta1)).sqrt());
    let term1 = 1.0 - 2.0 / (9.0 * a);
    let denom = 1.0 + x * (2.0 / (a - 4.0)).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    let term2 = denom.signum() * ((1.0 - 2.0 / a) / denom.abs()).cbrt();
    (term1 - term2) / (2.0 / (9.0 * a)).sqrt()
}
