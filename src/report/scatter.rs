//! Scatter plot of MMSE against hippocampal volume

use std::path::Path;
use std::sync::OnceLock;

use anyhow::{bail, Context, Result};
use plotters::prelude::*;
use polars::prelude::DataFrame;

use crate::pipeline::{complete_cases, AnalysisError};

pub const PLOT_TITLE: &str = "MMSE vs Hippocampal volume";
pub const X_LABEL: &str = "Hippocampal volume (mm³)";
pub const Y_LABEL: &str = "MMSE";

/// Figure is 6.4 x 4.8 inches rendered at this resolution
pub const PLOT_DPI: u32 = 200;
pub const PLOT_SIZE: (u32, u32) = (64 * PLOT_DPI / 10, 48 * PLOT_DPI / 10);

const FONT_FAMILY: &str = "sans-serif";
static FONT_BYTES: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
static FONT_REGISTERED: OnceLock<bool> = OnceLock::new();

const POINT_RADIUS: i32 = 6;
const POINT_COLOR: RGBColor = RGBColor(31, 119, 180);

/// Register the embedded font with plotters' glyph backend once per process
fn ensure_font() -> Result<()> {
    let registered = *FONT_REGISTERED.get_or_init(|| {
        plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES).is_ok()
    });
    if !registered {
        bail!("Failed to load the embedded plot font");
    }
    Ok(())
}

/// Axis range with 5% padding; a degenerate range is widened around its value
pub fn padded_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (min, max) = values.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })?;

    let span = max - min;
    if span > 0.0 {
        let pad = span * 0.05;
        Some((min - pad, max + pad))
    } else {
        let pad = if min == 0.0 { 1.0 } else { min.abs() * 0.05 };
        Some((min - pad, max + pad))
    }
}

/// Render the (hippocampal volume, MMSE) scatter plot to a PNG at `path`
///
/// Rows missing either value are skipped. Returns the number of points drawn.
pub fn render_scatter_plot(df: &DataFrame, path: &Path) -> Result<usize> {
    let rows = complete_cases(df, &["hippocampal_volume_mm3", "mmse"])?;
    if rows.is_empty() {
        return Err(AnalysisError::InsufficientData {
            analysis: "scatter plot",
            required: 1,
            found: 0,
        }
        .into());
    }

    let points: Vec<(f64, f64)> = rows.iter().map(|r| (r[0], r[1])).collect();
    draw_scatter(&points, path)
        .with_context(|| format!("Failed to render scatter plot: {}", path.display()))?;

    Ok(points.len())
}

fn draw_scatter(points: &[(f64, f64)], path: &Path) -> Result<()> {
    ensure_font()?;

    let (x_min, x_max) = padded_range(points.iter().map(|p| p.0)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = padded_range(points.iter().map(|p| p.1)).unwrap_or((0.0, 1.0));

    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(PLOT_TITLE, (FONT_FAMILY, 34).into_font())
        .margin(20)
        .x_label_area_size(80)
        .y_label_area_size(100)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(X_LABEL)
        .y_desc(Y_LABEL)
        .axis_desc_style((FONT_FAMILY, 28))
        .label_style((FONT_FAMILY, 22))
        .draw()?;

    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), POINT_RADIUS, POINT_COLOR.filled())),
    )?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_size_matches_figure_inches() {
        assert_eq!(PLOT_SIZE, (1280, 960));
    }

    #[test]
    fn test_padded_range() {
        let (lo, hi) = padded_range([2.0, 12.0].into_iter()).unwrap();
        assert!((lo - 1.5).abs() < 1e-12);
        assert!((hi - 12.5).abs() < 1e-12);
    }

    #[test]
    fn test_padded_range_degenerate() {
        let (lo, hi) = padded_range([0.0].into_iter()).unwrap();
        assert!(lo < 0.0 && hi > 0.0);

        let (lo, hi) = padded_range([3000.0, 3000.0].into_iter()).unwrap();
        assert!(lo < 3000.0 && hi > 3000.0);

        assert!(padded_range(std::iter::empty()).is_none());
    }
}
