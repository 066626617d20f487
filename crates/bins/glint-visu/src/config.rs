use crate::VisuError;
use base::{envmap::MAX_CUBE_SIZE, FresnelParams};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// Which of the two demo scenes to render.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SceneKind {
    /// Fresnel spheres scattered in front of the skybox.
    #[default]
    Field,
    /// Sphere mirroring its surroundings through a cube camera.
    Probe,
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneKind::Field => write!(f, "field"),
            SceneKind::Probe => write!(f, "probe"),
        }
    }
}

/// Largest accepted image width or height.
pub const MAX_IMAGE_DIMENSION: u32 = 16384;

/// Largest accepted render tile edge.
pub const MAX_TILE_SIZE: u32 = 1024;

/// Render options, read from a TOML file; every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RenderConfig {
    pub scene: SceneKind,
    /// Display width in pixels.
    pub width: u32,
    /// Display height in pixels.
    pub height: u32,
    /// Number of frames to render.
    pub frames: u32,
    /// Camera rotation around the orbit target between frames, in degrees.
    pub orbit_step: f32,
    /// Factor applied to the camera distance to the orbit target between
    /// frames; 1 keeps the distance.
    pub dolly_factor: f32,
    pub output_dir: PathBuf,
    /// Seed of the sphere placement of the field scene.
    pub seed: u64,
    /// Number of spheres of the field scene.
    pub sphere_count: u32,
    /// Skybox faces ordered +X, -X, +Y, -Y, +Z, -Z; a procedural sky is used
    /// when absent.
    pub skybox: Option<[PathBuf; 6]>,
    /// Face resolution of the cube camera of the probe scene.
    pub probe_resolution: u32,
    /// Overrides the fresnel parameters of the scene.
    pub fresnel: Option<FresnelParams>,
    /// Edge length of the render tiles.
    pub tile_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            scene: SceneKind::Field,
            width: 960,
            height: 540,
            frames: 1,
            orbit_step: 0.0,
            dolly_factor: 1.0,
            output_dir: PathBuf::from("."),
            seed: 0,
            sphere_count: 50,
            skybox: None,
            probe_resolution: 256,
            fresnel: None,
            tile_size: 32,
        }
    }
}

impl RenderConfig {
    /// Loads the configuration from a .toml file.
    pub fn load(path: &Path) -> Result<Self, VisuError> {
        let string = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&string).map_err(|source| VisuError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> { toml::from_str(s) }

    /// Rejects values the renderer cannot work with.
    pub fn validate(&self) -> Result<(), VisuError> {
        if self.width == 0 || self.height == 0 {
            return Err(VisuError::InvalidConfig(format!(
                "image dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > MAX_IMAGE_DIMENSION || self.height > MAX_IMAGE_DIMENSION {
            return Err(VisuError::InvalidConfig(format!(
                "image dimensions must not exceed {}, got {}x{}",
                MAX_IMAGE_DIMENSION, self.width, self.height
            )));
        }
        if self.probe_resolution == 0 || self.probe_resolution > MAX_CUBE_SIZE {
            return Err(VisuError::InvalidConfig(format!(
                "probe resolution must be in [1, {}], got {}",
                MAX_CUBE_SIZE, self.probe_resolution
            )));
        }
        if self.tile_size == 0 || self.tile_size > MAX_TILE_SIZE {
            return Err(VisuError::InvalidConfig(format!(
                "tile size must be in [1, {}], got {}",
                MAX_TILE_SIZE, self.tile_size
            )));
        }
        if !self.orbit_step.is_finite() {
            return Err(VisuError::InvalidConfig(format!(
                "orbit step must be finite, got {}",
                self.orbit_step
            )));
        }
        if !(self.dolly_factor.is_finite() && self.dolly_factor > 0.0) {
            return Err(VisuError::InvalidConfig(format!(
                "dolly factor must be positive, got {}",
                self.dolly_factor
            )));
        }
        if let Some(params) = &self.fresnel {
            params.validate().map_err(|source| VisuError::Material {
                object: "fresnel override".to_string(),
                source,
            })?;
        }
        Ok(())
    }
}
