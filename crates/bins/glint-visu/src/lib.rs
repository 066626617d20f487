//! Headless renderer for the glint scenes.
//!
//! Rays are cast from a perspective camera into a flat list of objects; hits
//! on fresnel materials are shaded with [`base::fresnel::shade`] against the
//! skybox or against the live capture of a cube camera.

pub mod camera;
pub mod config;
mod error;
pub mod hit;
pub mod material;
pub mod probe;
pub mod ray;
pub mod render;
pub mod scene;
pub mod scenes;

pub use error::VisuError;
