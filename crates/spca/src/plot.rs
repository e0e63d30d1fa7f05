//! PNG charts of the recovery metrics.
//!
//! Each method produces two files in the output directory:
//!
//! - `<method>_metrics.png`: sine error (left axis) and L1 norm of the
//!   recovered vector (right axis) against iteration,
//! - `<method>_sine_error.png`: the sine error alone.
//!
//! Iterations whose sine error is undefined (`NaN`) are left out of the
//! curves.

use crate::error::{ExperimentError, Result};
use crate::experiment::MethodReport;
use log::info;
use plotters::prelude::*;
use std::ops::Range;
use std::path::{Path, PathBuf};

const CHART_SIZE: (u32, u32) = (900, 600);

/// Finite `(iteration, value)` pairs of a metric sequence.
pub fn finite_points(values: &[f64]) -> Vec<(usize, f64)> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, &v)| (i, v))
        .collect()
}

/// Vertical range covering `points` with a small margin.
///
/// A flat or empty series still gets a non-degenerate range.
pub fn value_range(points: &[(usize, f64)]) -> Range<f64> {
    let (lo, hi) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, v)| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    let span = hi - lo;
    let pad = if span > 0.0 { 0.05 * span } else { 0.5 * lo.abs().max(1.0) };
    (lo - pad)..(hi + pad)
}

/// Path of the combined metrics chart for `report`.
pub fn metrics_path(dir: &Path, report: &MethodReport) -> PathBuf {
    dir.join(format!("{}_metrics.png", report.method))
}

/// Path of the sine-error chart for `report`.
pub fn sine_error_path(dir: &Path, report: &MethodReport) -> PathBuf {
    dir.join(format!("{}_sine_error.png", report.method))
}

/// Draws both charts of `report` into `dir`, creating it if needed.
pub fn plot_report(report: &MethodReport, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let paths = vec![
        plot_metrics(report, &metrics_path(dir, report))?,
        plot_sine_error(report, &sine_error_path(dir, report))?,
    ];
    info!("{}: wrote {} plots to {}", report.method, paths.len(), dir.display());
    Ok(paths)
}

/// Sine error and L1 norm on a shared iteration axis.
pub fn plot_metrics(report: &MethodReport, path: &Path) -> Result<PathBuf> {
    let sine = finite_points(&report.trace.sine_errors);
    let l1 = finite_points(&report.trace.l1_norms);
    let iterations = report.trace.len().max(1);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(ExperimentError::plot)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{}: recovery metrics", report.method), ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .right_y_label_area_size(60)
        .build_cartesian_2d(0..iterations, 0.0..1.0)
        .map_err(ExperimentError::plot)?
        .set_secondary_coord(0..iterations, value_range(&l1));

    chart
        .configure_mesh()
        .x_desc("Iteration")
        .y_desc("Sine error")
        .draw()
        .map_err(ExperimentError::plot)?;
    chart
        .configure_secondary_axes()
        .y_desc("L1 norm")
        .draw()
        .map_err(ExperimentError::plot)?;

    chart
        .draw_series(LineSeries::new(sine, &BLUE))
        .map_err(ExperimentError::plot)?
        .label("sine error")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
    chart
        .draw_secondary_series(LineSeries::new(l1, &RED))
        .map_err(ExperimentError::plot)?
        .label("L1 norm")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(ExperimentError::plot)?;

    root.present().map_err(ExperimentError::plot)?;
    Ok(path.to_path_buf())
}

/// Sine error against iteration.
pub fn plot_sine_error(report: &MethodReport, path: &Path) -> Result<PathBuf> {
    let sine = finite_points(&report.trace.sine_errors);
    let iterations = report.trace.len().max(1);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(ExperimentError::plot)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{}: sine error", report.method), ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0..iterations, 0.0..1.0)
        .map_err(ExperimentError::plot)?;

    chart
        .configure_mesh()
        .x_desc("Iteration")
        .y_desc("Sine error")
        .y_label_formatter(&|v| format!("{:.2}", v))
        .draw()
        .map_err(ExperimentError::plot)?;

    chart
        .draw_series(LineSeries::new(sine, &BLUE))
        .map_err(ExperimentError::plot)?;

    root.present().map_err(ExperimentError::plot)?;
    Ok(path.to_path_buf())
}
