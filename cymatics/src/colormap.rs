use anyhow::{anyhow, Result};
use colorgrad::{Color, Gradient, GradientBuilder, LinearGradient};
use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorMap {
    Inferno,
    Magma,
    Viridis,
    RdYlBu,
    /// Cyclic map that starts and ends on the same pale tone, suited to
    /// signed potentials and phases.
    Twilight,
}

// Stops sampled along the usual cyclic "twilight" map.
const TWILIGHT_STOPS: [(u8, u8, u8); 11] = [
    (226, 217, 226),
    (165, 190, 203),
    (104, 135, 193),
    (94, 68, 166),
    (72, 30, 112),
    (47, 20, 54),
    (110, 32, 80),
    (165, 62, 72),
    (198, 122, 95),
    (215, 178, 166),
    (226, 217, 226),
];

impl ColorMap {
    pub fn gradient(&self) -> Result<Box<dyn Gradient>> {
        let gradient: Box<dyn Gradient> = match self {
            ColorMap::Inferno => Box::new(colorgrad::preset::inferno()),
            ColorMap::Magma => Box::new(colorgrad::preset::magma()),
            ColorMap::Viridis => Box::new(colorgrad::preset::viridis()),
            ColorMap::RdYlBu => Box::new(colorgrad::preset::rd_yl_bu()),
            ColorMap::Twilight => {
                let stops: Vec<Color> = TWILIGHT_STOPS
                    .iter()
                    .map(|&(r, g, b)| Color::from_rgba8(r, g, b, 255))
                    .collect();
                let twilight = GradientBuilder::new()
                    .colors(&stops)
                    .build::<LinearGradient>()
                    .map_err(|e| anyhow!("Failed to build twilight colour map: {}", e))?;
                Box::new(twilight)
            }
        };
        Ok(gradient)
    }
}

/// Colour at fraction `t` of the gradient, clamped to [0, 1].
pub fn color_at(gradient: &dyn Gradient, t: f64) -> RGBColor {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.5 };
    let rgba = gradient.at(t as f32).to_rgba8();
    RGBColor(rgba[0], rgba[1], rgba[2])
}
