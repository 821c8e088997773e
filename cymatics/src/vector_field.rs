use crate::grid::Grid;
use crate::mask::DiscMask;
use ndarray::Array2;

/// Two-component vector field sampled on a grid.
#[derive(Debug, Clone)]
pub struct VectorField {
    pub u: Array2<f64>, // x component
    pub v: Array2<f64>, // y component
}

/// Derivative along x (first axis): central differences inside, one-sided
/// differences on the two edge columns.
pub fn partial_x(f: &Array2<f64>, dx: f64) -> Array2<f64> {
    let (nx, ny) = f.dim();
    let mut out = Array2::<f64>::zeros((nx, ny));
    if nx < 2 {
        return out;
    }
    for j in 0..ny {
        for i in 1..nx - 1 {
            out[[i, j]] = (f[[i + 1, j]] - f[[i - 1, j]]) / (2.0 * dx);
        }
        out[[0, j]] = (f[[1, j]] - f[[0, j]]) / dx;
        out[[nx - 1, j]] = (f[[nx - 1, j]] - f[[nx - 2, j]]) / dx;
    }
    out
}

/// Derivative along y (second axis), same stencil as [`partial_x`].
pub fn partial_y(f: &Array2<f64>, dy: f64) -> Array2<f64> {
    let (nx, ny) = f.dim();
    let mut out = Array2::<f64>::zeros((nx, ny));
    if ny < 2 {
        return out;
    }
    for i in 0..nx {
        for j in 1..ny - 1 {
            out[[i, j]] = (f[[i, j + 1]] - f[[i, j - 1]]) / (2.0 * dy);
        }
        out[[i, 0]] = (f[[i, 1]] - f[[i, 0]]) / dy;
        out[[i, ny - 1]] = (f[[i, ny - 1]] - f[[i, ny - 2]]) / dy;
    }
    out
}

impl VectorField {
    pub fn new(u: Array2<f64>, v: Array2<f64>) -> Self {
        debug_assert_eq!(u.dim(), v.dim());
        Self { u, v }
    }

    pub fn zeros(nx: usize, ny: usize) -> Self {
        Self {
            u: Array2::zeros((nx, ny)),
            v: Array2::zeros((nx, ny)),
        }
    }

    pub fn dim(&self) -> (usize, usize) {
        self.u.dim()
    }

    /// ∇f using the real grid spacing.
    pub fn gradient(potential: &Array2<f64>, grid: &Grid) -> Self {
        Self {
            u: partial_x(potential, grid.dx),
            v: partial_y(potential, grid.dy),
        }
    }

    pub fn negated(self) -> Self {
        Self {
            u: self.u.mapv_into(|c| -c),
            v: self.v.mapv_into(|c| -c),
        }
    }

    /// Exchange the two components.
    pub fn swapped(self) -> Self {
        Self {
            u: self.v,
            v: self.u,
        }
    }

    pub fn magnitude(&self) -> Array2<f64> {
        let mut mag = self.u.clone();
        mag.zip_mut_with(&self.v, |u, &v| *u = u.hypot(v));
        mag
    }

    pub fn divergence(&self, grid: &Grid) -> Array2<f64> {
        partial_x(&self.u, grid.dx) + partial_y(&self.v, grid.dy)
    }

    /// Scalar z-component of the curl, ∂v/∂x − ∂u/∂y.
    pub fn curl(&self, grid: &Grid) -> Array2<f64> {
        partial_x(&self.v, grid.dx) - partial_y(&self.u, grid.dy)
    }

    pub fn apply_mask(&mut self, grid: &Grid, mask: &DiscMask) {
        mask.apply(grid, &mut self.u);
        mask.apply(grid, &mut self.v);
    }

    /// Bilinear interpolation at a physical point. `None` outside the grid or
    /// when any of the four surrounding nodes is masked out.
    pub fn sample(&self, grid: &Grid, x: f64, y: f64) -> Option<(f64, f64)> {
        let (fi, fj) = grid.fractional_index(x, y)?;
        let i0 = (fi.floor() as usize).min(grid.nx - 2);
        let j0 = (fj.floor() as usize).min(grid.ny - 2);
        let tx = fi - i0 as f64;
        let ty = fj - j0 as f64;

        let lerp = |a: &Array2<f64>| {
            let c00 = a[[i0, j0]];
            let c10 = a[[i0 + 1, j0]];
            let c01 = a[[i0, j0 + 1]];
            let c11 = a[[i0 + 1, j0 + 1]];
            let bottom = c00 * (1.0 - tx) + c10 * tx;
            let top = c01 * (1.0 - tx) + c11 * tx;
            bottom * (1.0 - ty) + top * ty
        };

        let u = lerp(&self.u);
        let v = lerp(&self.v);
        if u.is_finite() && v.is_finite() {
            Some((u, v))
        } else {
            None
        }
    }
}

/// Largest finite absolute value, 0 when nothing is finite.
pub fn max_abs_finite(data: &Array2<f64>) -> f64 {
    data.iter()
        .filter(|v| v.is_finite())
        .map(|v| v.abs())
        .fold(0.0_f64, f64::max)
}
