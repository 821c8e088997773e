//! The two figure pipelines: grid → closed-form field → (mask, gradient) → plot.

use crate::anode::{AcousticAnode, AnodeField};
use crate::chladni::{chladni_magnitude, ChladniMode};
use crate::config::{AnodeConfig, ChladniConfig, OutputConfig};
use crate::grid::Grid;
use crate::streamlines::{trace_streamlines, Streamline};
use crate::visualisation::{FieldVisualiser, ScalarPanel, StreamStyle};
use anyhow::{anyhow, Context, Result};
use ndarray::Array2;
use plotters::style::WHITE;
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Magnitude fields for every configured mode, in configuration order.
pub fn chladni_fields(config: &ChladniConfig) -> (Grid, Vec<(ChladniMode, Array2<f64>)>) {
    let grid = config.grid();
    let fields = config
        .modes
        .par_iter()
        .map(|&mode| (mode, chladni_magnitude(&grid, mode)))
        .collect();
    (grid, fields)
}

pub fn render_chladni(config: &ChladniConfig, output: &OutputConfig) -> Result<PathBuf> {
    let start = Instant::now();
    let (grid, fields) = chladni_fields(config);
    info!(
        modes = fields.len(),
        points = grid.nx,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "evaluated standing-wave modes"
    );

    let panels: Vec<ScalarPanel<'_>> = fields
        .iter()
        .map(|(mode, values)| ScalarPanel {
            title: mode.title(),
            grid: &grid,
            values,
        })
        .collect();

    let gradient = config.colormap.gradient()?;
    let visualiser = FieldVisualiser::new(&output.dir, config.image_width, config.image_height)
        .with_context(|| format!("Failed to create output dir '{}'", output.dir.display()))?;
    visualiser
        .plot_panels(
            &output.chladni_file,
            &config.title,
            &panels,
            config.levels,
            gradient.as_ref(),
        )
        .map_err(|e| anyhow!("Failed to render Chladni figure: {}", e))
}

/// Masked potential and field plus the streamlines traced through it.
pub fn anode_field(config: &AnodeConfig) -> (AcousticAnode, AnodeField, Vec<Streamline>) {
    let anode = AcousticAnode::new(config.grid(), config.mode, config.disc_radius)
        .with_layout(config.field_layout);
    let result = anode.compute();
    let lines = trace_streamlines(&anode.grid, &result.field, &config.streamline_params());
    (anode, result, lines)
}

pub fn render_anode(config: &AnodeConfig, output: &OutputConfig) -> Result<PathBuf> {
    let start = Instant::now();
    let (anode, result, lines) = anode_field(config);
    let diag = anode.diagnostics(&result);
    info!(
        mode = anode.mode,
        layout = ?anode.layout,
        peak_potential = diag.peak_potential,
        peak_field = diag.peak_field,
        peak_curl = diag.peak_curl,
        coverage = diag.coverage,
        streamlines = lines.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "computed anode field"
    );

    let gradient = config.colormap.gradient()?;
    let style = StreamStyle {
        color: WHITE,
        line_width: config.line_width,
        arrow_size: config.arrow_size,
    };
    let visualiser = FieldVisualiser::new(&output.dir, config.image_width, config.image_height)
        .with_context(|| format!("Failed to create output dir '{}'", output.dir.display()))?;
    visualiser
        .plot_potential_with_streamlines(
            &output.anode_file,
            &anode.title(),
            &anode.grid,
            &result.potential,
            &lines,
            config.levels,
            gradient.as_ref(),
            &config.colorbar_label,
            &style,
        )
        .map_err(|e| anyhow!("Failed to render anode figure: {}", e))
}
