use crate::grid::Grid;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Pair of integer mode numbers for a square-plate standing wave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChladniMode {
    pub n: u32,
    pub m: u32,
}

impl ChladniMode {
    pub fn new(n: u32, m: u32) -> Self {
        Self { n, m }
    }

    /// Superposition of the (n, m) and (m, n) cosine modes at a point.
    ///
    /// The two terms are added rather than subtracted, so a mode with
    /// `n == m` gives a checkerboard net instead of cancelling to zero.
    pub fn amplitude(&self, x: f64, y: f64) -> f64 {
        let n = self.n as f64 * PI;
        let m = self.m as f64 * PI;
        (n * x).cos() * (m * y).cos() + (m * x).cos() * (n * y).cos()
    }

    pub fn title(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ChladniMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency Mode (n={}, m={})", self.n, self.m)
    }
}

impl FromStr for ChladniMode {
    type Err = String;

    /// Accepts `"7x11"` or `"7,11"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (n, m) = s
            .split_once(['x', 'X', ','])
            .ok_or_else(|| format!("expected a mode like 7x11, got '{}'", s))?;
        let n = n
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid n in '{}': {}", s, e))?;
        let m = m
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid m in '{}': {}", s, e))?;
        Ok(Self { n, m })
    }
}

/// The four presets shown side by side in the interference figure.
pub fn default_modes() -> Vec<ChladniMode> {
    vec![
        ChladniMode::new(2, 2),
        ChladniMode::new(5, 5),
        ChladniMode::new(7, 11),
        ChladniMode::new(13, 13),
    ]
}

/// Signed wave height of `mode` at every node of `grid`.
pub fn chladni_pattern(grid: &Grid, mode: ChladniMode) -> Array2<f64> {
    grid.evaluate(move |x, y| mode.amplitude(x, y))
}

/// Absolute wave height, the quantity that gets plotted.
pub fn chladni_magnitude(grid: &Grid, mode: ChladniMode) -> Array2<f64> {
    chladni_pattern(grid, mode).mapv_into(f64::abs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_modes_do_not_cancel() {
        let grid = Grid::linspace(-1.0, 1.0, 41);
        let z = chladni_pattern(&grid, ChladniMode::new(5, 5));
        let max_abs = z.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        assert!((max_abs - 2.0).abs() < 1e-9);
    }

    #[test]
    fn pattern_is_symmetric_in_x_and_y() {
        let grid = Grid::linspace(-1.0, 1.0, 33);
        let z = chladni_pattern(&grid, ChladniMode::new(7, 11));
        for i in 0..grid.nx {
            for j in 0..grid.ny {
                assert!((z[[i, j]] - z[[j, i]]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn origin_is_an_antinode() {
        let mode = ChladniMode::new(13, 13);
        assert!((mode.amplitude(0.0, 0.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn magnitude_is_non_negative_and_bounded() {
        let grid = Grid::linspace(-1.0, 1.0, 50);
        let z = chladni_magnitude(&grid, ChladniMode::new(2, 2));
        assert!(z.iter().all(|&v| (0.0..=2.0 + 1e-12).contains(&v)));
    }

    #[test]
    fn parses_both_separators() {
        assert_eq!("7x11".parse::<ChladniMode>(), Ok(ChladniMode::new(7, 11)));
        assert_eq!(" 2 , 3 ".parse::<ChladniMode>(), Ok(ChladniMode::new(2, 3)));
        assert!("seven".parse::<ChladniMode>().is_err());
        assert!("7x".parse::<ChladniMode>().is_err());
    }

    #[test]
    fn title_names_both_modes() {
        assert_eq!(ChladniMode::new(7, 11).title(), "Frequency Mode (n=7, m=11)");
        assert_eq!(ChladniMode::new(7, 11).to_string(), "Frequency Mode (n=7, m=11)");
    }
}
