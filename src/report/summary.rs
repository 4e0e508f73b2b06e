//! Run summary shown at the end of an analysis

use std::path::PathBuf;
use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{CorrelationResult, OlsFit};

/// Significance level used to color p-values
const ALPHA: f64 = 0.05;

/// Summary of one analysis run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub rows: usize,
    pub columns: usize,
    pub cells_coerced: usize,
    pub correlation: Option<CorrelationResult>,
    pub regression: Option<OlsFit>,
    pub outputs: Vec<PathBuf>,
    pub load_time: Duration,
    pub statistics_time: Duration,
    pub plot_time: Duration,
}

impl RunSummary {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            ..Default::default()
        }
    }

    pub fn set_load_time(&mut self, elapsed: Duration) {
        self.load_time = elapsed;
    }

    pub fn set_statistics_time(&mut self, elapsed: Duration) {
        self.statistics_time = elapsed;
    }

    pub fn set_plot_time(&mut self, elapsed: Duration) {
        self.plot_time = elapsed;
    }

    pub fn add_output(&mut self, path: PathBuf) {
        self.outputs.push(path);
    }

    pub fn total_time(&self) -> Duration {
        self.load_time + self.statistics_time + self.plot_time
    }

    /// Build the metrics table
    pub fn table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("📁 Subjects"), Cell::new(self.rows)]);
        table.add_row(vec![Cell::new("📐 Columns"), Cell::new(self.columns)]);
        table.add_row(vec![
            Cell::new("🧹 Cells Coerced to Missing"),
            Cell::new(self.cells_coerced).fg(if self.cells_coerced == 0 {
                Color::White
            } else {
                Color::Yellow
            }),
        ]);

        if let Some(corr) = &self.correlation {
            table.add_row(vec![
                Cell::new("🔗 Pearson r"),
                Cell::new(format!("{:.3} (n={})", corr.r, corr.n)).add_attribute(Attribute::Bold),
            ]);
            table.add_row(vec![
                Cell::new("   p-value"),
                Cell::new(format!("{:.4}", corr.p_value)).fg(p_value_color(corr.p_value)),
            ]);
        }

        if let Some(fit) = &self.regression {
            table.add_row(vec![
                Cell::new("📈 Regression R²"),
                Cell::new(format!("{:.3} (n={})", fit.r_squared, fit.nobs))
                    .add_attribute(Attribute::Bold),
            ]);
            table.add_row(vec![
                Cell::new("   F-test p-value"),
                Cell::new(format!("{:.4}", fit.f_p_value)).fg(p_value_color(fit.f_p_value)),
            ]);
        }

        table.add_row(vec![
            Cell::new("⏱️  Total Time"),
            Cell::new(format_duration(self.total_time())).fg(Color::Cyan),
        ]);

        table
    }

    pub fn display(&self) {
        eprintln!();
        eprintln!(
            "    {} {}",
            style("📋").cyan(),
            style("ANALYSIS SUMMARY").white().bold()
        );
        eprintln!("    {}", style("─".repeat(50)).dim());
        eprintln!();

        // Indent the table
        for line in self.table().to_string().lines() {
            eprintln!("    {}", line);
        }

        if !self.outputs.is_empty() {
            eprintln!();
            eprintln!(
                "    {} {}",
                style("💾").cyan(),
                style("OUTPUTS").white().bold()
            );
            eprintln!("    {}", style("─".repeat(50)).dim());
            for path in &self.outputs {
                eprintln!("      {} {}", style("•").dim(), path.display());
            }
        }
    }
}

fn p_value_color(p: f64) -> Color {
    if p < ALPHA {
        Color::Green
    } else {
        Color::White
    }
}

/// Format a duration as `850ms`, `2.41s` or `1m 05s`
pub fn format_duration(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else if millis < 60_000 {
        format!("{:.2}s", elapsed.as_secs_f64())
    } else {
        let secs = elapsed.as_secs();
        format!("{}m {:02}s", secs / 60, secs % 60)
    }
}
