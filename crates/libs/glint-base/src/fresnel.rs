//! # Fresnel environment shading
//!
//! Empirical fresnel model blending what a surface reflects with what it lets
//! through. For a surface point seen from the eye, with incidence
//! $I = p - e$ and unit normal $N$:
//!
//! + reflected direction: $R = I - 2(I \cdot N)N$
//! + refracted direction: $T = \mathrm{refract}(\hat{I}, N, \eta)$
//! + fresnel factor: $f = \mathrm{clamp}(b + s(1 + \hat{I} \cdot N)^p, 0,
//!   1)$
//!
//! and the final colour is $\mathrm{env}(T)(1 - f) + \mathrm{env}(R)f$, the
//! alpha of the refracted lookup being forced to one.
//!
//! Looking straight at the surface gives $\hat{I} \cdot N = -1$, so the power
//! term vanishes and the factor reduces to the bias; at grazing angles the
//! term grows towards $s$ and reflection dominates.
//!
//! The evaluation is split in two stages: [`FresnelParams::evaluate`] only
//! deals with geometry and yields the [`FresnelTerms`], [`shade`] samples the
//! environment with them.

use crate::{
    color::Rgba,
    envmap::EnvironmentMap,
    error::ShadingError,
    math::{saturate, Vec3},
    optics::{reflect, refract},
};
use serde::{Deserialize, Serialize};

/// A point on a surface, in world space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfacePoint {
    /// Position of the point.
    pub position: Vec3,
    /// Normal at the point; must be normalised by the caller.
    pub normal: Vec3,
}

impl SurfacePoint {
    /// Creates a new surface point.
    pub const fn new(position: Vec3, normal: Vec3) -> Self { Self { position, normal } }
}

/// Where the surface is seen from.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewContext {
    /// Position of the eye in world space.
    pub eye_position: Vec3,
}

impl ViewContext {
    /// Creates a new view context.
    pub const fn new(eye_position: Vec3) -> Self { Self { eye_position } }

    /// Unnormalised incidence direction from the eye to `point`.
    pub fn incidence(&self, point: &SurfacePoint) -> Vec3 { point.position - self.eye_position }
}

/// Parameters of the fresnel model, typically owned by a material.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FresnelParams {
    /// Ratio of the refractive indices of the two media (incident over
    /// transmitted), e.g. air over glass. Must be positive.
    pub refraction_ratio: f32,
    /// Constant part of the fresnel factor.
    pub bias: f32,
    /// Weight of the angle dependent part of the fresnel factor.
    pub scale: f32,
    /// Exponent of the angle dependent part. Negative values are accepted but
    /// carry no physical meaning.
    pub power: f32,
}

impl Default for FresnelParams {
    fn default() -> Self { Self::new(1.2, 0.1, 1.0, 1.0) }
}

/// Geometric outcome of the fresnel model at one surface point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FresnelTerms {
    /// Reflected direction (same length as the incidence vector).
    pub reflect: Vec3,
    /// Refracted direction, zero on total internal reflection.
    pub refract: Vec3,
    /// Blend factor in `[0, 1]`; 0 is fully refracted, 1 fully reflected.
    pub factor: f32,
}

impl FresnelParams {
    /// Creates a new parameter set.
    pub const fn new(refraction_ratio: f32, bias: f32, scale: f32, power: f32) -> Self {
        Self {
            refraction_ratio,
            bias,
            scale,
            power,
        }
    }

    /// Checks that the parameters can be used for shading.
    pub fn validate(&self) -> Result<(), ShadingError> {
        if self.refraction_ratio > 0.0 && self.refraction_ratio.is_finite() {
            Ok(())
        } else {
            Err(ShadingError::InvalidParameter {
                name: "refraction_ratio",
                value: self.refraction_ratio,
            })
        }
    }

    /// Computes the reflected and refracted directions and the fresnel factor
    /// for `point` seen from `view`.
    pub fn evaluate(
        &self,
        point: &SurfacePoint,
        view: &ViewContext,
    ) -> Result<FresnelTerms, ShadingError> {
        self.validate()?;
        let i = view.incidence(point);
        let i_hat = i.try_normalize().ok_or(ShadingError::DegenerateGeometry)?;
        let n = point.normal;
        Ok(FresnelTerms {
            reflect: reflect(i, n),
            refract: refract(i_hat, n, self.refraction_ratio),
            factor: fresnel_factor(i_hat, n, self),
        })
    }
}

/// Computes the fresnel factor `clamp(bias + scale * (1 + dot(i_hat, n))^power,
/// 0, 1)`.
///
/// # Arguments
///
/// * `i_hat` - Normalised incidence direction, pointing towards the surface.
/// * `n` - Surface normal (normalised).
/// * `params` - Model parameters.
///
/// # Notes
///
/// With a zero `scale` the power term is skipped entirely, and a base that
/// rounding pushed slightly below zero is treated as zero, so the result is
/// always a number in `[0, 1]` for finite parameters.
pub fn fresnel_factor(i_hat: Vec3, n: Vec3, params: &FresnelParams) -> f32 {
    if params.scale == 0.0 {
        return saturate(params.bias);
    }
    let base = (1.0 + i_hat.dot(n)).max(0.0);
    saturate(params.bias + params.scale * base.powf(params.power))
}

/// Shades `point` seen from `view` with the fresnel model.
///
/// The environment is sampled twice, first along the reflected direction,
/// then along the refracted one; the refracted colour is made opaque before
/// the two are blended.
///
/// # Errors
///
/// * [`ShadingError::InvalidParameter`] if `params.refraction_ratio` is not
///   positive.
/// * [`ShadingError::DegenerateGeometry`] if the eye coincides with the point.
pub fn shade<E: EnvironmentMap + ?Sized>(
    point: SurfacePoint,
    view: ViewContext,
    params: FresnelParams,
    env: &E,
) -> Result<Rgba, ShadingError> {
    let terms = params.evaluate(&point, &view)?;
    let reflected = env.sample(terms.reflect);
    let refracted = env.sample(terms.refract).with_alpha(1.0);
    Ok(refracted.mix(reflected, terms.factor))
}
