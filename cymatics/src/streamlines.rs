//! Streamline tracing over a sampled vector field.
//!
//! A coarse occupancy mask (about `30 * density` cells per axis) covers the
//! domain. Seeds are taken from free mask cells in spiral order, border
//! first, and each seed is integrated forwards and backwards along the unit
//! field direction. A trajectory stops as soon as it steps into a mask cell
//! that another trajectory already owns, which keeps the lines evenly spaced.

use crate::grid::Grid;
use crate::vector_field::VectorField;
use ndarray::Array2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamlineParams {
    /// Line spacing control; 1.0 gives a 30×30 occupancy mask.
    pub density: f64,
    /// Trajectories shorter than this (fraction of the domain size) are dropped.
    pub min_length: f64,
    /// Upper bound on a single direction's length (fraction of the domain size).
    pub max_length: f64,
    /// Integration step as a fraction of one mask cell.
    pub step_fraction: f64,
}

impl Default for StreamlineParams {
    fn default() -> Self {
        Self {
            density: 1.0,
            min_length: 0.1,
            max_length: 4.0,
            step_fraction: 0.2,
        }
    }
}

impl StreamlineParams {
    /// Density, step and maximum length must be finite and positive; the
    /// minimum length finite and not negative. A zero step never advances.
    pub fn is_usable(&self) -> bool {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        positive(self.density)
            && positive(self.step_fraction)
            && positive(self.max_length)
            && self.min_length.is_finite()
            && self.min_length >= 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Streamline {
    pub points: Vec<(f64, f64)>,
}

impl Streamline {
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| (w[1].0 - w[0].0).hypot(w[1].1 - w[0].1))
            .sum()
    }

    /// Anchor point and unit direction halfway along the arc, where the
    /// arrowhead is drawn.
    pub fn arrow(&self) -> Option<((f64, f64), (f64, f64))> {
        let half = self.length() / 2.0;
        if half <= 0.0 {
            return None;
        }
        let mut travelled = 0.0;
        for w in self.points.windows(2) {
            let (a, b) = (w[0], w[1]);
            let seg = (b.0 - a.0).hypot(b.1 - a.1);
            if seg > 0.0 && travelled + seg >= half {
                let t = (half - travelled) / seg;
                let anchor = (a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t);
                let dir = ((b.0 - a.0) / seg, (b.1 - a.1) / seg);
                return Some((anchor, dir));
            }
            travelled += seg;
        }
        None
    }
}

struct Occupancy {
    cells: Array2<bool>,
    nx: usize,
    ny: usize,
    x_min: f64,
    y_min: f64,
    width: f64,
    height: f64,
}

impl Occupancy {
    fn new(grid: &Grid, density: f64) -> Self {
        let n = ((30.0 * density).round() as usize).max(1);
        Self {
            cells: Array2::from_elem((n, n), false),
            nx: n,
            ny: n,
            x_min: grid.x_min(),
            y_min: grid.y_min(),
            width: grid.width(),
            height: grid.height(),
        }
    }

    fn cell_size(&self) -> f64 {
        (self.width / self.nx as f64).min(self.height / self.ny as f64)
    }

    fn cell_of(&self, x: f64, y: f64) -> (usize, usize) {
        let fx = ((x - self.x_min) / self.width * self.nx as f64).floor();
        let fy = ((y - self.y_min) / self.height * self.ny as f64).floor();
        (
            (fx.max(0.0) as usize).min(self.nx - 1),
            (fy.max(0.0) as usize).min(self.ny - 1),
        )
    }

    fn center_of(&self, cell: (usize, usize)) -> (f64, f64) {
        (
            self.x_min + (cell.0 as f64 + 0.5) / self.nx as f64 * self.width,
            self.y_min + (cell.1 as f64 + 0.5) / self.ny as f64 * self.height,
        )
    }

    fn is_taken(&self, cell: (usize, usize)) -> bool {
        self.cells[[cell.0, cell.1]]
    }

    fn claim(&mut self, cell: (usize, usize)) {
        self.cells[[cell.0, cell.1]] = true;
    }

    fn release(&mut self, cells: &[(usize, usize)]) {
        for &(i, j) in cells {
            self.cells[[i, j]] = false;
        }
    }
}

/// Cells of an `nx × ny` lattice ordered as an inward spiral starting at the
/// bottom-left corner.
pub fn spiral_order(nx: usize, ny: usize) -> Vec<(usize, usize)> {
    let mut out = Vec::with_capacity(nx * ny);
    if nx == 0 || ny == 0 {
        return out;
    }
    let (mut left, mut right) = (0isize, nx as isize - 1);
    let (mut bottom, mut top) = (0isize, ny as isize - 1);
    while left <= right && bottom <= top {
        for x in left..=right {
            out.push((x as usize, bottom as usize));
        }
        for y in bottom + 1..=top {
            out.push((right as usize, y as usize));
        }
        if top > bottom {
            for x in (left..right).rev() {
                out.push((x as usize, top as usize));
            }
        }
        if right > left {
            for y in (bottom + 1..top).rev() {
                out.push((left as usize, y as usize));
            }
        }
        left += 1;
        right -= 1;
        bottom += 1;
        top -= 1;
    }
    out
}

struct Tracer<'a> {
    grid: &'a Grid,
    field: &'a VectorField,
    step: f64,
    scale: f64,
    max_length: f64,
}

impl Tracer<'_> {
    fn direction(&self, p: (f64, f64), sign: f64) -> Option<(f64, f64)> {
        let (u, v) = self.field.sample(self.grid, p.0, p.1)?;
        let speed = u.hypot(v);
        if speed <= f64::EPSILON {
            return None;
        }
        Some((sign * u / speed, sign * v / speed))
    }

    /// Midpoint-rule integration from `start` in one direction. Newly
    /// entered mask cells are claimed and recorded in `trail`.
    fn integrate(
        &self,
        start: (f64, f64),
        sign: f64,
        occupancy: &mut Occupancy,
        trail: &mut Vec<(usize, usize)>,
    ) -> Vec<(f64, f64)> {
        let mut points = Vec::new();
        let mut p = start;
        let mut cell = occupancy.cell_of(p.0, p.1);
        let mut length = 0.0;

        while length < self.max_length {
            let Some(d1) = self.direction(p, sign) else {
                break;
            };
            let mid = (p.0 + 0.5 * self.step * d1.0, p.1 + 0.5 * self.step * d1.1);
            let Some(d2) = self.direction(mid, sign) else {
                break;
            };
            let next = (p.0 + self.step * d2.0, p.1 + self.step * d2.1);
            if self.field.sample(self.grid, next.0, next.1).is_none() {
                break;
            }

            let next_cell = occupancy.cell_of(next.0, next.1);
            if next_cell != cell {
                if occupancy.is_taken(next_cell) {
                    break;
                }
                occupancy.claim(next_cell);
                trail.push(next_cell);
                cell = next_cell;
            }

            points.push(next);
            length += self.step / self.scale;
            p = next;
        }
        points
    }
}

/// Trace evenly spaced streamlines through `field`. Nodes holding NaN act as
/// walls, so a masked field yields lines confined to the unmasked region.
pub fn trace_streamlines(
    grid: &Grid,
    field: &VectorField,
    params: &StreamlineParams,
) -> Vec<Streamline> {
    if grid.nx < 2 || grid.ny < 2 || !params.is_usable() {
        return Vec::new();
    }

    let mut occupancy = Occupancy::new(grid, params.density);
    let scale = grid.width().max(grid.height());
    let tracer = Tracer {
        grid,
        field,
        step: params.step_fraction * occupancy.cell_size(),
        scale,
        max_length: params.max_length,
    };

    let mut lines = Vec::new();
    for seed_cell in spiral_order(occupancy.nx, occupancy.ny) {
        if occupancy.is_taken(seed_cell) {
            continue;
        }
        let seed = occupancy.center_of(seed_cell);
        if tracer.direction(seed, 1.0).is_none() {
            continue;
        }

        occupancy.claim(seed_cell);
        let mut trail = vec![seed_cell];
        let backward = tracer.integrate(seed, -1.0, &mut occupancy, &mut trail);
        let forward = tracer.integrate(seed, 1.0, &mut occupancy, &mut trail);

        let mut points: Vec<(f64, f64)> = backward.into_iter().rev().collect();
        points.push(seed);
        points.extend(forward);

        let line = Streamline { points };
        if line.length() / scale < params.min_length {
            occupancy.release(&trail);
            continue;
        }
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::DiscMask;
    use std::collections::HashSet;

    #[test]
    fn spiral_visits_every_cell_once() {
        for &(nx, ny) in &[(1, 1), (4, 4), (5, 3), (2, 7)] {
            let order = spiral_order(nx, ny);
            assert_eq!(order.len(), nx * ny);
            let unique: HashSet<_> = order.iter().copied().collect();
            assert_eq!(unique.len(), nx * ny);
        }
        let order = spiral_order(3, 3);
        assert_eq!(order[0], (0, 0));
        assert_eq!(order[2], (2, 0));
        assert_eq!(order[8], (1, 1));
    }

    #[test]
    fn uniform_field_gives_horizontal_lines() {
        let grid = Grid::linspace(-1.0, 1.0, 21);
        let field = VectorField::new(
            Array2::from_elem((21, 21), 2.0),
            Array2::zeros((21, 21)),
        );
        let lines = trace_streamlines(&grid, &field, &StreamlineParams::default());
        assert!(!lines.is_empty());
        for line in &lines {
            let y0 = line.points[0].1;
            assert!(line.points.iter().all(|p| (p.1 - y0).abs() < 1e-12));
            let (_, dir) = line.arrow().unwrap();
            assert!((dir.0 - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn rotation_field_keeps_radius() {
        let grid = Grid::linspace(-1.0, 1.0, 41);
        let (xs, ys) = grid.meshgrid();
        let field = VectorField::new(ys.mapv(|y| -y), xs);
        let lines = trace_streamlines(&grid, &field, &StreamlineParams::default());
        assert!(!lines.is_empty());
        for line in &lines {
            let radii: Vec<f64> = line.points.iter().map(|p| p.0.hypot(p.1)).collect();
            let min = radii.iter().copied().fold(f64::INFINITY, f64::min);
            let max = radii.iter().copied().fold(0.0, f64::max);
            if min > 0.2 {
                assert!(max - min < 0.01, "radius drift {}", max - min);
            }
        }
    }

    #[test]
    fn masked_region_is_never_entered() {
        let grid = Grid::linspace(-3.0, 3.0, 60);
        let mask = DiscMask::centered(2.0);
        let mut field = VectorField::new(
            Array2::from_elem((60, 60), 1.0),
            Array2::from_elem((60, 60), 0.5),
        );
        field.apply_mask(&grid, &mask);
        let lines = trace_streamlines(&grid, &field, &StreamlineParams::default());
        assert!(!lines.is_empty());
        for line in &lines {
            assert!(line.points.iter().all(|&(x, y)| mask.contains(x, y)));
        }
    }

    #[test]
    fn zero_field_has_no_lines() {
        let grid = Grid::linspace(-1.0, 1.0, 10);
        let field = VectorField::zeros(10, 10);
        assert!(trace_streamlines(&grid, &field, &StreamlineParams::default()).is_empty());
    }

    #[test]
    fn unusable_params_trace_nothing() {
        let grid = Grid::linspace(-1.0, 1.0, 21);
        let field = VectorField::new(
            Array2::from_elem((21, 21), 1.0),
            Array2::zeros((21, 21)),
        );
        let bad = [
            StreamlineParams { step_fraction: 0.0, ..StreamlineParams::default() },
            StreamlineParams { step_fraction: -0.2, ..StreamlineParams::default() },
            StreamlineParams { max_length: 0.0, ..StreamlineParams::default() },
            StreamlineParams { density: f64::NAN, ..StreamlineParams::default() },
            StreamlineParams { min_length: f64::INFINITY, ..StreamlineParams::default() },
        ];
        for params in &bad {
            assert!(!params.is_usable());
            assert!(trace_streamlines(&grid, &field, params).is_empty());
        }
        assert!(StreamlineParams::default().is_usable());
    }

    #[test]
    fn arrow_sits_halfway() {
        let line = Streamline {
            points: vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (1.0, 3.0)],
        };
        let (anchor, dir) = line.arrow().unwrap();
        assert!((anchor.0 - 1.0).abs() < 1e-12);
        assert!((anchor.1 - 1.0).abs() < 1e-12);
        assert_eq!(dir, (0.0, 1.0));
        assert!(Streamline { points: vec![(0.0, 0.0)] }.arrow().is_none());
    }
}
