//! Rotating potential on a piezoelectric disc.
//!
//! Two standing waves with the same radial envelope `r·exp(-r²)` and angular
//! order `n` are combined a quarter period apart (`cos nθ` and `sin nθ`).
//! Their difference is a single travelling-wave snapshot whose phase spirals
//! around the centre. The disc turns that snapshot into a potential `V`, and
//! the field is derived from `−V` by finite differences.
//!
//! With the default [`FieldLayout::Array`] the derivative taken along the
//! array rows (y) becomes the x component and the one along the columns (x)
//! becomes the y component, `E = (−∂V/∂y, −∂V/∂x)`. That swapped field is
//! not curl-free and traces the rotating spiral. [`FieldLayout::Physical`]
//! gives the plain gradient `E = −∇V`, a curl-free dipole.

use crate::grid::Grid;
use crate::mask::DiscMask;
use crate::vector_field::{max_abs_finite, VectorField};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// How the two derivatives of `−V` are assigned to the field components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldLayout {
    /// Row derivative first: `(−∂V/∂y, −∂V/∂x)`.
    #[default]
    Array,
    /// True gradient: `(−∂V/∂x, −∂V/∂y)`.
    Physical,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcousticAnode {
    pub grid: Grid,
    pub mode: u32,
    pub disc: DiscMask,
    pub layout: FieldLayout,
}

/// Potential and field after masking. Nodes outside the disc hold NaN.
#[derive(Debug, Clone)]
pub struct AnodeField {
    pub potential: Array2<f64>,
    pub field: VectorField,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnodeDiagnostics {
    pub peak_potential: f64,
    pub peak_field: f64,
    pub peak_curl: f64,
    pub coverage: f64,
}

pub fn radial_envelope(r: f64) -> f64 {
    r * (-r * r).exp()
}

impl AcousticAnode {
    pub fn new(grid: Grid, mode: u32, disc_radius: f64) -> Self {
        Self {
            grid,
            mode,
            disc: DiscMask::centered(disc_radius),
            layout: FieldLayout::default(),
        }
    }

    pub fn with_layout(mut self, layout: FieldLayout) -> Self {
        self.layout = layout;
        self
    }

    /// In-phase component, displacement at t = 0.
    pub fn wave_a(&self, x: f64, y: f64) -> f64 {
        let n = self.mode as f64;
        (n * y.atan2(x)).cos() * radial_envelope(x.hypot(y))
    }

    /// Quadrature component, displacement a quarter period later.
    pub fn wave_b(&self, x: f64, y: f64) -> f64 {
        let n = self.mode as f64;
        (n * y.atan2(x)).sin() * radial_envelope(x.hypot(y))
    }

    pub fn potential_at(&self, x: f64, y: f64) -> f64 {
        self.wave_a(x, y) - self.wave_b(x, y)
    }

    /// Unmasked potential over the whole grid.
    pub fn potential(&self) -> Array2<f64> {
        let anode = *self;
        self.grid.evaluate(move |x, y| anode.potential_at(x, y))
    }

    pub fn compute(&self) -> AnodeField {
        let mut potential = self.potential();
        let gradient = VectorField::gradient(&potential, &self.grid).negated();
        let mut field = match self.layout {
            FieldLayout::Array => gradient.swapped(),
            FieldLayout::Physical => gradient,
        };

        field.apply_mask(&self.grid, &self.disc);
        self.disc.apply(&self.grid, &mut potential);

        AnodeField { potential, field }
    }

    pub fn diagnostics(&self, result: &AnodeField) -> AnodeDiagnostics {
        AnodeDiagnostics {
            peak_potential: max_abs_finite(&result.potential),
            peak_field: max_abs_finite(&result.field.magnitude()),
            peak_curl: max_abs_finite(&result.field.curl(&self.grid)),
            coverage: self.disc.coverage(&self.grid),
        }
    }

    pub fn title(&self) -> String {
        format!(
            "The Acoustic Anode: Rotating Electric Field (Mode n={})",
            self.mode
        )
    }
}
