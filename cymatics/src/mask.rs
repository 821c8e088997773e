use crate::grid::Grid;
use ndarray::{Array2, Zip};

/// Static circular mask. Nodes outside the disc are written as NaN so the
/// renderer and the streamline tracer both skip them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscMask {
    pub radius: f64,
    pub cx: f64,
    pub cy: f64,
}

impl DiscMask {
    pub fn centered(radius: f64) -> Self {
        Self {
            radius,
            cx: 0.0,
            cy: 0.0,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        (x - self.cx).hypot(y - self.cy) <= self.radius
    }

    pub fn apply(&self, grid: &Grid, data: &mut Array2<f64>) {
        Zip::indexed(data).for_each(|(i, j), value| {
            if !self.contains(grid.x_coord(i), grid.y_coord(j)) {
                *value = f64::NAN;
            }
        });
    }

    /// Fraction of grid nodes that fall inside the disc.
    pub fn coverage(&self, grid: &Grid) -> f64 {
        if grid.is_empty() {
            return 0.0;
        }
        let inside = (0..grid.nx)
            .flat_map(|i| (0..grid.ny).map(move |j| (i, j)))
            .filter(|&(i, j)| self.contains(grid.x_coord(i), grid.y_coord(j)))
            .count();
        inside as f64 / grid.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_is_inside() {
        let mask = DiscMask::centered(2.0);
        assert!(mask.contains(2.0, 0.0));
        assert!(mask.contains(0.0, -2.0));
        assert!(!mask.contains(1.5, 1.5));
    }

    #[test]
    fn apply_blanks_the_corners_only() {
        let grid = Grid::linspace(-3.0, 3.0, 7);
        let mut data = Array2::from_elem((7, 7), 1.0);
        DiscMask::centered(2.8).apply(&grid, &mut data);
        assert!(data[[0, 0]].is_nan());
        assert!(data[[6, 6]].is_nan());
        assert_eq!(data[[3, 3]], 1.0);
        assert_eq!(data[[3, 1]], 1.0);
    }

    #[test]
    fn coverage_approaches_disc_area() {
        let grid = Grid::linspace(-3.0, 3.0, 301);
        let coverage = DiscMask::centered(2.8).coverage(&grid);
        let expected = std::f64::consts::PI * 2.8 * 2.8 / 36.0;
        assert!((coverage - expected).abs() < 0.01);
    }
}
