//! Neurostat: hippocampal volume vs MMSE analysis
//!
//! Loads the subject table, cleans the numeric columns, writes the
//! correlation and regression summary, and renders the scatter plot.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::style;
use indicatif::ProgressBar;

use neurostat::cli::{AnalysisConfig, Cli};
use neurostat::pipeline::{
    analyze_missing_values, clean_subject_table, correlate_columns, dataset_shape,
    fit_mmse_model, load_subject_table, REQUIRED_COLUMNS,
};
use neurostat::report::{
    append_regression_summary, export_stats_json, format_correlation_line, render_scatter_plot,
    write_correlation_summary, ExportParams, RunSummary,
};
use neurostat::utils::{
    create_spinner, finish_with_error, finish_with_success, print_banner, print_config,
    print_count, print_info, print_step_header, print_step_time, print_success, print_warning,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.to_config()?;

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&config);

    run(&config)?;

    println!("Analysis complete. Check outputs/ for results.");
    Ok(())
}

fn run(config: &AnalysisConfig) -> Result<()> {
    config.ensure_output_dirs()?;

    // Step 1: Load and clean
    print_step_header(1, "Load & Clean");

    let step_start = Instant::now();
    let spinner = create_spinner("Loading subject table...");
    let raw = stage(&spinner, "Loading failed", load_subject_table(&config.data_path))?;
    finish_with_success(&spinner, "Subject table loaded");

    let (rows, cols, memory_mb) = dataset_shape(&raw);
    eprintln!("\n    {} Dataset Statistics:", style("✧").cyan());
    eprintln!("      Rows: {}", rows);
    eprintln!("      Columns: {}", cols);
    eprintln!("      Estimated memory: {:.2} MB", memory_mb);

    let (df, cleaning) = clean_subject_table(raw)?;
    if !cleaning.renamed.is_empty() {
        print_info(&format!("Normalized {} column name(s)", cleaning.renamed.len()));
    }
    if cleaning.total_coerced() == 0 {
        print_success("All required values parsed as numbers");
    } else {
        for (column, count) in &cleaning.coerced_to_missing {
            if *count > 0 {
                print_count(
                    "unparseable cell(s) set to missing",
                    *count,
                    Some(&format!("({})", column)),
                );
            }
        }
    }

    let missing = analyze_missing_values(&df, &REQUIRED_COLUMNS)?;
    for (column, ratio) in missing.iter().filter(|(_, ratio)| *ratio > 0.0) {
        print_info(&format!("{}: {:.1}% missing", column, ratio * 100.0));
    }

    let mut summary = RunSummary::new(rows, cols);
    summary.cells_coerced = cleaning.total_coerced();
    let load_elapsed = step_start.elapsed();
    summary.set_load_time(load_elapsed);
    print_step_time(load_elapsed);

    // Step 2: Correlation and regression
    print_step_header(2, "Statistics");

    let step_start = Instant::now();
    let summary_path = config.summary_path();

    let spinner = create_spinner("Computing Pearson correlation...");
    let correlation = stage(
        &spinner,
        "Correlation failed",
        correlate_columns(&df, "hippocampal_volume_mm3", "mmse"),
    )?;
    write_correlation_summary(&summary_path, &correlation)?;
    finish_with_success(&spinner, &format_correlation_line(&correlation));
    if correlation.excluded_rows > 0 {
        print_count(
            "row(s) excluded from the correlation",
            correlation.excluded_rows,
            Some("(missing volume or MMSE)"),
        );
    }

    let spinner = create_spinner("Fitting OLS regression...");
    let fit = stage(&spinner, "Regression failed", fit_mmse_model(&df))?;
    append_regression_summary(&summary_path, &fit)?;
    finish_with_success(
        &spinner,
        &format!("Regression fitted: R²={:.3}, n={}", fit.r_squared, fit.nobs),
    );
    if fit.excluded_rows > 0 {
        print_count(
            "row(s) excluded from the regression",
            fit.excluded_rows,
            Some("(incomplete cases)"),
        );
    }
    if fit.condition_number > 1000.0 {
        print_warning(&format!(
            "Large condition number ({:.3e}); predictors may be collinear",
            fit.condition_number
        ));
    }
    print_success(&format!("Summary written to {}", summary_path.display()));

    summary.add_output(summary_path);
    let stats_elapsed = step_start.elapsed();
    summary.set_statistics_time(stats_elapsed);
    print_step_time(stats_elapsed);

    // Step 3: Scatter plot
    print_step_header(3, "Scatter Plot");

    let step_start = Instant::now();
    let plot_path = config.plot_path();
    let spinner = create_spinner("Rendering scatter plot...");
    let points = stage(&spinner, "Plotting failed", render_scatter_plot(&df, &plot_path))?;
    finish_with_success(&spinner, &format!("Plotted {} subject(s)", points));
    print_success(&format!("Figure saved to {}", plot_path.display()));

    summary.add_output(plot_path);
    let plot_elapsed = step_start.elapsed();
    summary.set_plot_time(plot_elapsed);
    print_step_time(plot_elapsed);

    if config.export_json {
        let json_path = config.json_path();
        let params = ExportParams {
            input_file: &config.data_path,
            rows,
            cells_coerced_to_missing: cleaning.total_coerced(),
        };
        export_stats_json(&correlation, Some(&fit), &json_path, &params)?;
        print_success(&format!("Results exported to {}", json_path.display()));
        summary.add_output(json_path);
    }

    summary.correlation = Some(correlation);
    summary.regression = Some(fit);
    summary.display();

    Ok(())
}

/// Mark the spinner failed before propagating a stage error
fn stage<T>(spinner: &ProgressBar, failure: &str, result: Result<T>) -> Result<T> {
    if result.is_err() {
        finish_with_error(spinner, failure);
    }
    result
}
