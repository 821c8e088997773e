use crate::colormap::color_at;
use crate::contour::ContourLevels;
use crate::grid::Grid;
use crate::streamlines::Streamline;
use colorgrad::Gradient;
use ndarray::Array2;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::error::Error;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

type FieldChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// One scalar field with its panel title.
pub struct ScalarPanel<'a> {
    pub title: String,
    pub grid: &'a Grid,
    pub values: &'a Array2<f64>,
}

#[derive(Debug, Clone, Copy)]
pub struct StreamStyle {
    pub color: RGBColor,
    pub line_width: f64,
    pub arrow_size: f64,
}

pub struct FieldVisualiser {
    output_dir: PathBuf,
    width: u32,
    height: u32,
}

impl FieldVisualiser {
    pub fn new(output_dir: &Path, width: u32, height: u32) -> std::io::Result<Self> {
        std::fs::create_dir_all(output_dir)?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            width,
            height,
        })
    }

    /// Filled contour panels laid out on a near-square grid under a shared
    /// title, white text on black.
    pub fn plot_panels(
        &self,
        file_name: &str,
        title: &str,
        panels: &[ScalarPanel<'_>],
        bands: usize,
        gradient: &dyn Gradient,
    ) -> Result<PathBuf, Box<dyn Error>> {
        let path = self.output_dir.join(file_name);
        {
            // the drawing areas borrow `path` until the end of this block
            let root = BitMapBackend::new(&path, (self.width, self.height)).into_drawing_area();
            root.fill(&BLACK)?;
            let body = root.titled(title, ("sans-serif", 32).into_font().color(&WHITE))?;

            let cols = ((panels.len() as f64).sqrt().ceil() as usize).max(1);
            let rows = panels.len().div_ceil(cols).max(1);
            let areas = body.split_evenly((rows, cols));

            for (area, panel) in areas.iter().zip(panels) {
                let Some(levels) = ContourLevels::from_data(panel.values, bands) else {
                    debug!(title = %panel.title, "panel has no finite values, skipping");
                    continue;
                };
                let (x_range, y_range) = cell_ranges(panel.grid);
                let mut chart = ChartBuilder::on(area)
                    .caption(&panel.title, ("sans-serif", 20).into_font().color(&WHITE))
                    .margin(8)
                    .build_cartesian_2d(x_range, y_range)?;
                draw_filled_contour(&mut chart, panel.grid, panel.values, &levels, gradient)?;
            }

            root.present()?;
        }
        info!(path = %path.display(), "saved figure");
        Ok(path)
    }

    /// Potential as a filled contour with a colour bar, overlaid with
    /// streamlines. The plot area is square and black so masked nodes read
    /// as background.
    #[allow(clippy::too_many_arguments)]
    pub fn plot_potential_with_streamlines(
        &self,
        file_name: &str,
        title: &str,
        grid: &Grid,
        potential: &Array2<f64>,
        streamlines: &[Streamline],
        bands: usize,
        gradient: &dyn Gradient,
        colorbar_label: &str,
        style: &StreamStyle,
    ) -> Result<PathBuf, Box<dyn Error>> {
        let levels = ContourLevels::from_data(potential, bands)
            .ok_or("potential has no finite values to plot")?;

        let path = self.output_dir.join(file_name);
        {
            let root = BitMapBackend::new(&path, (self.width, self.height)).into_drawing_area();
            root.fill(&WHITE)?;
            let body = root.titled(title, ("sans-serif", 26).into_font().color(&BLACK))?;

            let (w, _) = body.dim_in_pixel();
            let bar_width = (w / 6).max(110).min(w / 2);
            let (plot_area, bar_area) = body.split_horizontally((w - bar_width) as i32);
            let plot_area = square(plot_area);

            let (x_range, y_range) = cell_ranges(grid);
            let mut chart = ChartBuilder::on(&plot_area)
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(40)
                .build_cartesian_2d(x_range, y_range)?;
            chart.plotting_area().fill(&BLACK)?;
            chart
                .configure_mesh()
                .disable_mesh()
                .x_labels(7)
                .y_labels(7)
                .draw()?;

            draw_filled_contour(&mut chart, grid, potential, &levels, gradient)?;
            draw_streamlines(&mut chart, grid, streamlines, style)?;
            draw_colorbar(&bar_area, &levels, gradient, colorbar_label)?;

            root.present()?;
        }
        info!(
            path = %path.display(),
            streamlines = streamlines.len(),
            "saved figure"
        );
        Ok(path)
    }
}

/// Axis ranges that give every node a full cell.
fn cell_ranges(grid: &Grid) -> (Range<f64>, Range<f64>) {
    let hx = grid.dx / 2.0;
    let hy = grid.dy / 2.0;
    (
        grid.x_min() - hx..grid.x_max() + hx,
        grid.y_min() - hy..grid.y_max() + hy,
    )
}

fn square<DB: DrawingBackend>(area: DrawingArea<DB, Shift>) -> DrawingArea<DB, Shift> {
    let (w, h) = area.dim_in_pixel();
    let side = w.min(h);
    area.shrink(
        (((w - side) / 2) as i32, ((h - side) / 2) as i32),
        (side as i32, side as i32),
    )
}

fn draw_filled_contour<DB: DrawingBackend>(
    chart: &mut FieldChart<'_, DB>,
    grid: &Grid,
    values: &Array2<f64>,
    levels: &ContourLevels,
    gradient: &dyn Gradient,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let colors: Vec<RGBColor> = (0..levels.bands())
        .map(|b| color_at(gradient, levels.band_fraction(b)))
        .collect();
    let hx = grid.dx / 2.0;
    let hy = grid.dy / 2.0;

    let cells = values.indexed_iter().filter_map(|((i, j), &value)| {
        let band = levels.band(value)?;
        let (x, y) = (grid.x_coord(i), grid.y_coord(j));
        Some(Rectangle::new(
            [(x - hx, y - hy), (x + hx, y + hy)],
            colors[band].filled(),
        ))
    });
    chart.draw_series(cells)?;
    Ok(())
}

fn draw_streamlines<DB: DrawingBackend>(
    chart: &mut FieldChart<'_, DB>,
    grid: &Grid,
    streamlines: &[Streamline],
    style: &StreamStyle,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let stroke = (style.line_width.ceil() as u32).max(1);
    chart.draw_series(
        streamlines
            .iter()
            .map(|line| PathElement::new(line.points.clone(), style.color.stroke_width(stroke))),
    )?;

    // arrow length scales with the domain so it reads the same at any extent
    let length = style.arrow_size * grid.width().max(grid.height()) / 60.0;
    let arrows = streamlines.iter().filter_map(|line| {
        let ((ax, ay), (dx, dy)) = line.arrow()?;
        let tip = (ax + dx * length * 0.5, ay + dy * length * 0.5);
        let back = (ax - dx * length * 0.5, ay - dy * length * 0.5);
        let (nx, ny) = (-dy * length * 0.35, dx * length * 0.35);
        Some(Polygon::new(
            vec![tip, (back.0 + nx, back.1 + ny), (back.0 - nx, back.1 - ny)],
            style.color.filled(),
        ))
    });
    chart.draw_series(arrows)?;
    Ok(())
}

fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    levels: &ContourLevels,
    gradient: &dyn Gradient,
    label: &str,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let (lo, hi) = levels.range();
    let hi = if hi > lo { hi } else { lo + 1.0 };

    let mut chart = ChartBuilder::on(area)
        .margin_top(40)
        .margin_bottom(60)
        .margin_right(30)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..1.0, lo..hi)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(8)
        .y_label_formatter(&|v| format!("{:.2}", v))
        .y_desc(label)
        .axis_desc_style(("sans-serif", 16))
        .label_style(("sans-serif", 13))
        .draw()?;

    chart.draw_series(levels.edges().windows(2).enumerate().map(|(b, edge)| {
        Rectangle::new(
            [(0.0, edge[0]), (1.0, edge[1])],
            color_at(gradient, levels.band_fraction(b)).filled(),
        )
    }))?;
    Ok(())
}
