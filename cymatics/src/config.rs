use crate::anode::FieldLayout;
use crate::chladni::{default_modes, ChladniMode};
use crate::colormap::ColorMap;
use crate::grid::Grid;
use crate::streamlines::StreamlineParams;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Where and how large the rendered figures are
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_chladni_file")]
    pub chladni_file: String,
    #[serde(default = "default_anode_file")]
    pub anode_file: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_chladni_file() -> String {
    "chladni_modes.png".to_string()
}

fn default_anode_file() -> String {
    "acoustic_anode.png".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            chladni_file: default_chladni_file(),
            anode_file: default_anode_file(),
        }
    }
}

impl OutputConfig {
    fn validate(&self) -> Result<()> {
        for name in [&self.chladni_file, &self.anode_file] {
            if !name.ends_with(".png") {
                return Err(anyhow!("Output file '{}' must be a .png", name));
            }
        }
        Ok(())
    }
}

/// Finite and strictly above zero; NaN fails.
fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Standing-wave interference figure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChladniConfig {
    #[serde(default = "default_chladni_points")]
    pub points: usize,
    #[serde(default = "default_chladni_extent")]
    pub extent: f64, // grid spans [-extent, extent]
    #[serde(default = "default_chladni_levels")]
    pub levels: usize,
    #[serde(default = "default_chladni_colormap")]
    pub colormap: ColorMap,
    #[serde(default = "default_modes")]
    pub modes: Vec<ChladniMode>,
    #[serde(default = "default_chladni_title")]
    pub title: String,
    #[serde(default = "default_chladni_width")]
    pub image_width: u32,
    #[serde(default = "default_chladni_height")]
    pub image_height: u32,
}

fn default_chladni_points() -> usize {
    500
}

fn default_chladni_extent() -> f64 {
    1.0
}

fn default_chladni_levels() -> usize {
    30
}

fn default_chladni_colormap() -> ColorMap {
    ColorMap::Inferno
}

fn default_chladni_title() -> String {
    "The Geometry of Sound: Positive Superposition".to_string()
}

fn default_chladni_width() -> u32 {
    1200
}

fn default_chladni_height() -> u32 {
    800
}

impl Default for ChladniConfig {
    fn default() -> Self {
        Self {
            points: default_chladni_points(),
            extent: default_chladni_extent(),
            levels: default_chladni_levels(),
            colormap: default_chladni_colormap(),
            modes: default_modes(),
            title: default_chladni_title(),
            image_width: default_chladni_width(),
            image_height: default_chladni_height(),
        }
    }
}

impl ChladniConfig {
    fn validate(&self) -> Result<()> {
        if self.points < 2 {
            return Err(anyhow!("chladni.points must be at least 2, got {}", self.points));
        }
        if !positive(self.extent) {
            return Err(anyhow!("chladni.extent must be positive, got {}", self.extent));
        }
        if self.levels == 0 {
            return Err(anyhow!("chladni.levels must be positive"));
        }
        if self.modes.is_empty() {
            return Err(anyhow!("At least one Chladni mode must be defined"));
        }
        if self.image_width == 0 || self.image_height == 0 {
            return Err(anyhow!(
                "Image dimensions must be positive (width={}, height={})",
                self.image_width,
                self.image_height
            ));
        }
        Ok(())
    }

    pub fn grid(&self) -> Grid {
        Grid::linspace(-self.extent, self.extent, self.points)
    }
}

/// Rotating potential on a piezo disc
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnodeConfig {
    #[serde(default = "default_anode_points")]
    pub points: usize,
    #[serde(default = "default_anode_extent")]
    pub extent: f64,
    #[serde(default = "default_disc_radius")]
    pub disc_radius: f64,
    #[serde(default = "default_anode_mode")]
    pub mode: u32,
    #[serde(default)]
    pub field_layout: FieldLayout,
    #[serde(default = "default_anode_levels")]
    pub levels: usize,
    #[serde(default = "default_anode_colormap")]
    pub colormap: ColorMap,
    #[serde(default = "default_stream_density")]
    pub stream_density: f64,
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    #[serde(default = "default_arrow_size")]
    pub arrow_size: f64,
    #[serde(default = "default_colorbar_label")]
    pub colorbar_label: String,
    #[serde(default = "default_anode_width")]
    pub image_width: u32,
    #[serde(default = "default_anode_height")]
    pub image_height: u32,
}

fn default_anode_points() -> usize {
    100
}

fn default_anode_extent() -> f64 {
    3.0
}

fn default_disc_radius() -> f64 {
    2.8
}

fn default_anode_mode() -> u32 {
    1
}

fn default_anode_levels() -> usize {
    40
}

fn default_anode_colormap() -> ColorMap {
    ColorMap::Twilight
}

fn default_stream_density() -> f64 {
    1.5
}

fn default_line_width() -> f64 {
    1.2
}

fn default_arrow_size() -> f64 {
    1.5
}

fn default_colorbar_label() -> String {
    "Piezoelectric Potential (Volts)".to_string()
}

fn default_anode_width() -> u32 {
    1000
}

fn default_anode_height() -> u32 {
    800
}

impl Default for AnodeConfig {
    fn default() -> Self {
        Self {
            points: default_anode_points(),
            extent: default_anode_extent(),
            disc_radius: default_disc_radius(),
            mode: default_anode_mode(),
            field_layout: FieldLayout::default(),
            levels: default_anode_levels(),
            colormap: default_anode_colormap(),
            stream_density: default_stream_density(),
            line_width: default_line_width(),
            arrow_size: default_arrow_size(),
            colorbar_label: default_colorbar_label(),
            image_width: default_anode_width(),
            image_height: default_anode_height(),
        }
    }
}

impl AnodeConfig {
    fn validate(&self) -> Result<()> {
        if self.points < 2 {
            return Err(anyhow!("anode.points must be at least 2, got {}", self.points));
        }
        if !positive(self.extent) {
            return Err(anyhow!("anode.extent must be positive, got {}", self.extent));
        }
        if !positive(self.disc_radius) {
            return Err(anyhow!(
                "anode.disc_radius must be positive, got {}",
                self.disc_radius
            ));
        }
        if self.disc_radius > self.extent * std::f64::consts::SQRT_2 {
            return Err(anyhow!(
                "anode.disc_radius ({}) reaches past the grid corners (extent={})",
                self.disc_radius,
                self.extent
            ));
        }
        if self.levels == 0 {
            return Err(anyhow!("anode.levels must be positive"));
        }
        if !positive(self.stream_density) {
            return Err(anyhow!(
                "anode.stream_density must be positive, got {}",
                self.stream_density
            ));
        }
        if !positive(self.line_width) || !positive(self.arrow_size) {
            return Err(anyhow!(
                "line_width and arrow_size must be positive (line_width={}, arrow_size={})",
                self.line_width,
                self.arrow_size
            ));
        }
        if self.image_width == 0 || self.image_height == 0 {
            return Err(anyhow!(
                "Image dimensions must be positive (width={}, height={})",
                self.image_width,
                self.image_height
            ));
        }
        Ok(())
    }

    pub fn grid(&self) -> Grid {
        Grid::linspace(-self.extent, self.extent, self.points)
    }

    pub fn streamline_params(&self) -> StreamlineParams {
        StreamlineParams {
            density: self.stream_density,
            ..StreamlineParams::default()
        }
    }
}

/// Complete configuration. Every section is optional in the TOML file and
/// falls back to the built-in presets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub chladni: ChladniConfig,
    #[serde(default)]
    pub anode: AnodeConfig,
}

impl Config {
    /// Load and validate configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let config = Self::parse_file(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config = Self::parse_toml(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse without validating, so command-line overrides can be
    /// applied first.
    pub fn parse_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file '{}': {}", path.display(), e))?;
        Self::parse_toml(&content)
    }

    pub fn parse_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| anyhow!("Failed to parse TOML config: {}", e))
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<()> {
        self.output.validate()?;
        self.chladni.validate()?;
        self.anode.validate()?;
        Ok(())
    }

    pub fn log_summary(&self) {
        info!(dir = %self.output.dir.display(), "output");
        let modes: Vec<String> = self
            .chladni
            .modes
            .iter()
            .map(|m| format!("{}x{}", m.n, m.m))
            .collect();
        info!(
            points = self.chladni.points,
            extent = self.chladni.extent,
            levels = self.chladni.levels,
            colormap = ?self.chladni.colormap,
            modes = %modes.join(", "),
            "chladni"
        );
        info!(
            points = self.anode.points,
            extent = self.anode.extent,
            disc_radius = self.anode.disc_radius,
            mode = self.anode.mode,
            field_layout = ?self.anode.field_layout,
            levels = self.anode.levels,
            stream_density = self.anode.stream_density,
            "anode"
        );
    }
}
