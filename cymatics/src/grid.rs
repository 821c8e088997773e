use ndarray::{Array2, Zip};

/// Regular 2D sampling of the (x, y) plane. Arrays built on a grid are shaped
/// `(nx, ny)` and indexed `[[i, j]]` with `i` along x and `j` along y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub nx: usize, // Number of points in x direction
    pub ny: usize, // Number of points in y direction
    pub x0: f64,   // First x sample
    pub y0: f64,   // First y sample
    pub dx: f64,   // Grid spacing in x
    pub dy: f64,   // Grid spacing in y
}

impl Grid {
    pub fn new(nx: usize, ny: usize, x0: f64, y0: f64, dx: f64, dy: f64) -> Self {
        Grid { nx, ny, x0, y0, dx, dy }
    }

    /// Square grid with both axes sampled as `linspace(min, max, points)`,
    /// endpoints included.
    pub fn linspace(min: f64, max: f64, points: usize) -> Self {
        let spacing = if points > 1 {
            (max - min) / (points - 1) as f64
        } else {
            0.0
        };
        Grid::new(points, points, min, min, spacing, spacing)
    }

    pub fn x_coord(&self, i: usize) -> f64 {
        self.x0 + self.dx * (i as f64)
    }

    pub fn y_coord(&self, j: usize) -> f64 {
        self.y0 + self.dy * (j as f64)
    }

    pub fn in_bounds(&self, i: usize, j: usize) -> bool {
        i < self.nx && j < self.ny
    }

    pub fn x_min(&self) -> f64 {
        self.x0
    }

    pub fn x_max(&self) -> f64 {
        self.x_coord(self.nx.saturating_sub(1))
    }

    pub fn y_min(&self) -> f64 {
        self.y0
    }

    pub fn y_max(&self) -> f64 {
        self.y_coord(self.ny.saturating_sub(1))
    }

    pub fn width(&self) -> f64 {
        self.x_max() - self.x_min()
    }

    pub fn height(&self) -> f64 {
        self.y_max() - self.y_min()
    }

    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evaluate a closed-form `f(x, y)` at every node, in parallel.
    pub fn evaluate<F>(&self, f: F) -> Array2<f64>
    where
        F: Fn(f64, f64) -> f64 + Sync + Send,
    {
        let mut out = Array2::<f64>::zeros((self.nx, self.ny));
        Zip::indexed(&mut out).par_for_each(|(i, j), value| {
            *value = f(self.x_coord(i), self.y_coord(j));
        });
        out
    }

    /// Coordinate arrays `(X, Y)` for every node.
    pub fn meshgrid(&self) -> (Array2<f64>, Array2<f64>) {
        let xs = Array2::from_shape_fn((self.nx, self.ny), |(i, _)| self.x_coord(i));
        let ys = Array2::from_shape_fn((self.nx, self.ny), |(_, j)| self.y_coord(j));
        (xs, ys)
    }

    /// Continuous index coordinates of a point, `None` outside the domain.
    pub fn fractional_index(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if self.nx < 2 || self.ny < 2 || !x.is_finite() || !y.is_finite() {
            return None;
        }
        let fi = (x - self.x0) / self.dx;
        let fj = (y - self.y0) / self.dy;
        let max_i = (self.nx - 1) as f64;
        let max_j = (self.ny - 1) as f64;
        if fi < 0.0 || fj < 0.0 || fi > max_i || fj > max_j {
            return None;
        }
        Some((fi, fj))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_includes_both_endpoints() {
        let grid = Grid::linspace(-1.0, 1.0, 5);
        assert_eq!(grid.nx, 5);
        assert_eq!(grid.ny, 5);
        assert!((grid.dx - 0.5).abs() < 1e-12);
        assert!((grid.x_min() + 1.0).abs() < 1e-12);
        assert!((grid.x_max() - 1.0).abs() < 1e-12);
        assert!((grid.width() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn evaluate_uses_x_on_first_axis() {
        let grid = Grid::linspace(0.0, 3.0, 4);
        let field = grid.evaluate(|x, y| 10.0 * x + y);
        assert_eq!(field.dim(), (4, 4));
        assert!((field[[2, 1]] - 21.0).abs() < 1e-12);
        assert!((field[[1, 2]] - 12.0).abs() < 1e-12);
    }

    #[test]
    fn meshgrid_matches_coordinates() {
        let grid = Grid::linspace(-3.0, 3.0, 7);
        let (xs, ys) = grid.meshgrid();
        assert!((xs[[6, 0]] - 3.0).abs() < 1e-12);
        assert!((ys[[0, 6]] - 3.0).abs() < 1e-12);
        assert!((ys[[6, 0]] + 3.0).abs() < 1e-12);
    }

    #[test]
    fn fractional_index_rejects_outside_points() {
        let grid = Grid::linspace(-1.0, 1.0, 3);
        assert_eq!(grid.fractional_index(0.0, 0.0), Some((1.0, 1.0)));
        assert_eq!(grid.fractional_index(1.5, 0.0), None);
        assert_eq!(grid.fractional_index(0.0, f64::NAN), None);
        assert!(grid.in_bounds(2, 2));
        assert!(!grid.in_bounds(3, 0));
    }
}
