//! # glint-base
//! Core library for glint.
//!
//! Contains the vector/optics primitives, the environment map abstraction and
//! the fresnel shading model that blends a reflected and a refracted
//! environment lookup with an angle dependent weight.
#![warn(missing_docs)]

#[cfg(feature = "cli")]
pub mod cli;
pub mod color;
pub mod envmap;
pub mod error;
pub mod fresnel;
pub mod math;
pub mod optics;

pub use color::Rgba;
pub use envmap::EnvironmentMap;
pub use error::ShadingError;
pub use fresnel::{shade, FresnelParams, FresnelTerms, SurfacePoint, ViewContext};
