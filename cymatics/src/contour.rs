use ndarray::Array2;

/// Equally spaced bands between the finite extremes of a scalar field,
/// used to quantise values for a filled contour plot.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourLevels {
    edges: Vec<f64>,
}

impl ContourLevels {
    pub fn linear(min: f64, max: f64, bands: usize) -> Self {
        let bands = if max > min { bands.max(1) } else { 1 };
        let step = (max - min) / bands as f64;
        let edges = (0..=bands)
            .map(|k| if k == bands { max } else { min + step * k as f64 })
            .collect();
        Self { edges }
    }

    /// Levels spanning the finite values of `data`. NaNs are ignored;
    /// `None` when no value is finite.
    pub fn from_data(data: &Array2<f64>, bands: usize) -> Option<Self> {
        let (min, max) = data
            .iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })?;
        Some(Self::linear(min, max, bands))
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn bands(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn range(&self) -> (f64, f64) {
        (self.edges[0], self.edges[self.edges.len() - 1])
    }

    pub fn band(&self, value: f64) -> Option<usize> {
        if !value.is_finite() {
            return None;
        }
        let (min, max) = self.range();
        if max <= min {
            return Some(0);
        }
        let t = (value - min) / (max - min);
        let band = (t * self.bands() as f64).floor();
        Some((band.max(0.0) as usize).min(self.bands() - 1))
    }

    /// Midpoint of a band mapped onto [0, 1], for colour lookup.
    pub fn band_fraction(&self, band: usize) -> f64 {
        let bands = self.bands();
        if bands <= 1 {
            return 0.5;
        }
        (band.min(bands - 1) as f64 + 0.5) / bands as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_levels_cover_the_range() {
        let levels = ContourLevels::linear(0.0, 2.0, 4);
        assert_eq!(levels.edges(), &[0.0, 0.5, 1.0, 1.5, 2.0]);
        assert_eq!(levels.bands(), 4);
        assert_eq!(levels.band(0.0), Some(0));
        assert_eq!(levels.band(0.74), Some(1));
        assert_eq!(levels.band(2.0), Some(3));
        assert_eq!(levels.band(5.0), Some(3));
        assert_eq!(levels.band(f64::NAN), None);
    }

    #[test]
    fn from_data_skips_nan() {
        let mut data = Array2::from_shape_vec((2, 2), vec![-1.0, 3.0, 0.5, 1.0]).unwrap();
        data[[0, 1]] = f64::NAN;
        let levels = ContourLevels::from_data(&data, 40).unwrap();
        assert_eq!(levels.range(), (-1.0, 1.0));
        assert_eq!(levels.bands(), 40);
    }

    #[test]
    fn constant_and_empty_fields() {
        let flat = Array2::from_elem((3, 3), 0.7);
        let levels = ContourLevels::from_data(&flat, 30).unwrap();
        assert_eq!(levels.bands(), 1);
        assert_eq!(levels.band(0.7), Some(0));
        assert_eq!(levels.band_fraction(0), 0.5);

        let empty = Array2::from_elem((2, 2), f64::NAN);
        assert!(ContourLevels::from_data(&empty, 30).is_none());
    }

    #[test]
    fn band_fraction_is_midpoint() {
        let levels = ContourLevels::linear(0.0, 1.0, 4);
        assert!((levels.band_fraction(0) - 0.125).abs() < 1e-12);
        assert!((levels.band_fraction(3) - 0.875).abs() < 1e-12);
    }
}
