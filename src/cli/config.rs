//! Run configuration: input and output locations resolved against a project root

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub const DEFAULT_DATA_PATH: &str = "data/sample/sample_neuro_data.csv";
pub const TABLES_DIR: &str = "outputs/tables";
pub const FIGURES_DIR: &str = "outputs/figures";

pub const SUMMARY_FILE: &str = "stats_summary.txt";
pub const PLOT_FILE: &str = "scatter_mmse_vs_volume.png";
pub const JSON_FILE: &str = "stats_summary.json";

/// Paths and switches for one analysis run, built once at startup
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisConfig {
    pub root: PathBuf,
    pub data_path: PathBuf,
    pub tables_dir: PathBuf,
    pub figures_dir: PathBuf,
    pub export_json: bool,
}

impl AnalysisConfig {
    /// Default layout under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            data_path: root.join(DEFAULT_DATA_PATH),
            tables_dir: root.join(TABLES_DIR),
            figures_dir: root.join(FIGURES_DIR),
            export_json: false,
            root,
        }
    }

    pub fn with_data_path(mut self, data_path: PathBuf) -> Self {
        self.data_path = data_path;
        self
    }

    pub fn with_export_json(mut self, export_json: bool) -> Self {
        self.export_json = export_json;
        self
    }

    pub fn summary_path(&self) -> PathBuf {
        self.tables_dir.join(SUMMARY_FILE)
    }

    pub fn plot_path(&self) -> PathBuf {
        self.figures_dir.join(PLOT_FILE)
    }

    pub fn json_path(&self) -> PathBuf {
        self.tables_dir.join(JSON_FILE)
    }

    /// Create both output directories if absent. Safe to call repeatedly.
    pub fn ensure_output_dirs(&self) -> Result<()> {
        for dir in [&self.tables_dir, &self.figures_dir] {
            create_dir(dir)?;
        }
        Ok(())
    }
}

fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))
}
