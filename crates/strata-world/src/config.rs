use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ChunkDims, ConfigError};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WorldConfig {
    #[serde(default)]
    pub chunk: ChunkSection,
    /// Number of valid Y levels; defaults to the chunk height.
    #[serde(default)]
    pub world_height: Option<i64>,
    #[serde(default)]
    pub shading: ShadingConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
}

impl WorldConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: WorldConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn dims(&self) -> Result<ChunkDims, ConfigError> {
        Ok(ChunkDims::new(self.chunk.size_x, self.chunk.size_y, self.chunk.size_z)?)
    }

    pub fn world_height(&self) -> i32 {
        self.world_height.unwrap_or(self.chunk.size_y) as i32
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.dims()?;
        let h = self.world_height.unwrap_or(self.chunk.size_y);
        if h <= 0 || h > i32::MAX as i64 {
            return Err(ConfigError::Invalid(format!("world_height must be positive, got {}", h)));
        }
        self.shading.validate()?;
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChunkSection {
    #[serde(default = "default_chunk_xz")]
    pub size_x: i64,
    #[serde(default = "default_chunk_y")]
    pub size_y: i64,
    #[serde(default = "default_chunk_xz")]
    pub size_z: i64,
}
fn default_chunk_xz() -> i64 {
    16
}
fn default_chunk_y() -> i64 {
    64
}
impl Default for ChunkSection {
    fn default() -> Self {
        Self {
            size_x: default_chunk_xz(),
            size_y: default_chunk_y(),
            size_z: default_chunk_xz(),
        }
    }
}

/// Static per-face shade constants. Top faces are always full brightness.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShadingConfig {
    #[serde(default = "default_enable_shading")]
    pub enable_face_shading: bool,
    #[serde(default = "default_bottom_shade")]
    pub bottom_shade: f32,
    #[serde(default = "default_east_west_shade")]
    pub east_west_shade: f32,
    #[serde(default = "default_north_south_shade")]
    pub north_south_shade: f32,
    #[serde(default)]
    pub variation_strength: f32,
}
fn default_enable_shading() -> bool {
    true
}
fn default_bottom_shade() -> f32 {
    0.5
}
fn default_east_west_shade() -> f32 {
    0.8
}
fn default_north_south_shade() -> f32 {
    0.65
}
impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            enable_face_shading: default_enable_shading(),
            bottom_shade: default_bottom_shade(),
            east_west_shade: default_east_west_shade(),
            north_south_shade: default_north_south_shade(),
            variation_strength: 0.0,
        }
    }
}

impl ShadingConfig {
    pub fn disabled() -> Self {
        Self {
            enable_face_shading: false,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("bottom_shade", self.bottom_shade),
            ("east_west_shade", self.east_west_shade),
            ("north_south_shade", self.north_south_shade),
            ("variation_strength", self.variation_strength),
        ];
        for (name, v) in fields {
            if !(0.0..=1.0).contains(&v) {
                return Err(ConfigError::Invalid(format!("shading.{} must be in [0,1], got {}", name, v)));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Flat,
    Noise,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_mode")]
    pub mode: Mode,
    #[serde(default)]
    pub seed: i32,
    #[serde(default)]
    pub flat: Flat,
    #[serde(default)]
    pub noise: Noise,
}
fn default_mode() -> Mode {
    Mode::Noise
}
impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            seed: 0,
            flat: Flat::default(),
            noise: Noise::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Flat {
    #[serde(default = "default_flat_thickness")]
    pub thickness: i32,
    #[serde(default = "default_flat_block")]
    pub block: String,
}
fn default_flat_thickness() -> i32 {
    4
}
fn default_flat_block() -> String {
    "stone".to_string()
}
impl Default for Flat {
    fn default() -> Self {
        Self {
            thickness: default_flat_thickness(),
            block: default_flat_block(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Noise {
    #[serde(default = "default_noise_frequency")]
    pub frequency: f32,
    #[serde(default = "default_base_height")]
    pub base_height: i32,
    #[serde(default = "default_amplitude")]
    pub amplitude: f32,
    #[serde(default = "default_surface")]
    pub surface: String,
    #[serde(default = "default_filler")]
    pub filler: String,
    #[serde(default = "default_filler_depth")]
    pub filler_depth: i32,
    #[serde(default = "default_flat_block")]
    pub stone: String,
}
fn default_noise_frequency() -> f32 {
    0.02
}
fn default_base_height() -> i32 {
    24
}
fn default_amplitude() -> f32 {
    10.0
}
fn default_surface() -> String {
    "grass".to_string()
}
fn default_filler() -> String {
    "dirt".to_string()
}
fn default_filler_depth() -> i32 {
    3
}
impl Default for Noise {
    fn default() -> Self {
        Self {
            frequency: default_noise_frequency(),
            base_height: default_base_height(),
            amplitude: default_amplitude(),
            surface: default_surface(),
            filler: default_filler(),
            filler_depth: default_filler_depth(),
            stone: default_flat_block(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let cfg = WorldConfig::from_toml_str("").unwrap();
        let d = cfg.dims().unwrap();
        assert_eq!((d.sx(), d.sy(), d.sz()), (16, 64, 16));
        assert_eq!(cfg.world_height(), 64);
        assert_eq!(cfg.shading, ShadingConfig::default());
        assert_eq!(cfg.generation.mode, Mode::Noise);
    }

    #[test]
    fn partial_sections_fill_in() {
        let cfg = WorldConfig::from_toml_str(
            r#"
            world_height = 48
            [chunk]
            size_x = 8
            [shading]
            bottom_shade = 0.3
            variation_strength = 0.1
            [generation]
            mode = "flat"
            flat = { thickness = 2 }
        "#,
        )
        .unwrap();
        assert_eq!(cfg.chunk.size_x, 8);
        assert_eq!(cfg.chunk.size_z, 16);
        assert_eq!(cfg.world_height(), 48);
        assert_eq!(cfg.shading.bottom_shade, 0.3);
        assert_eq!(cfg.shading.east_west_shade, 0.8);
        assert!(cfg.shading.enable_face_shading);
        assert_eq!(cfg.generation.mode, Mode::Flat);
        assert_eq!(cfg.generation.flat.thickness, 2);
        assert_eq!(cfg.generation.flat.block, "stone");
    }

    #[test]
    fn non_positive_sizes_are_rejected() {
        let err = WorldConfig::from_toml_str("[chunk]\nsize_y = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Dimensions(_)));
        let err = WorldConfig::from_toml_str("world_height = -3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn shade_out_of_range_is_rejected() {
        let err = WorldConfig::from_toml_str("[shading]\neast_west_shade = 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
