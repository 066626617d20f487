use base::{envmap::EnvMapError, ShadingError};
use std::path::PathBuf;

/// Errors of the renderer binary.
#[derive(Debug, thiserror::Error)]
pub enum VisuError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse configuration file '{}': {source}", path.display())]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid material on '{object}': {source}")]
    Material {
        object: String,
        source: ShadingError,
    },
    #[error(transparent)]
    EnvMap(#[from] EnvMapError),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
