//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

use super::config::AnalysisConfig;

/// Neurostat - correlate hippocampal volume with MMSE and fit a regression model
///
/// With no arguments the analysis reads `data/sample/sample_neuro_data.csv`
/// under the current directory and writes to `outputs/`.
#[derive(Parser, Debug)]
#[command(name = "neurostat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project root; input and output paths are resolved against it.
    /// Defaults to the current working directory.
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Input CSV file (header row required).
    /// Defaults to <root>/data/sample/sample_neuro_data.csv
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Also write the results as JSON to <root>/outputs/tables/stats_summary.json
    #[arg(long, default_value = "false")]
    pub export_json: bool,
}

impl Cli {
    /// Resolve the project root, falling back to the current directory
    pub fn root_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }

    /// Build the run configuration from the parsed arguments
    pub fn to_config(&self) -> anyhow::Result<AnalysisConfig> {
        let mut config = AnalysisConfig::new(self.root_dir()?);
        if let Some(input) = &self.input {
            config = config.with_data_path(input.clone());
        }
        Ok(config.with_export_json(self.export_json))
    }
}
