//! Geometric optics: reflection and refraction of directions at a surface.
//!
//! Both functions follow the conventions of the GLSL built-ins of the same
//! name: the incident vector points *towards* the surface (it ends up on the
//! point of incidence) and the normal is expected to be normalised.

use crate::math::Vec3;

/// Reflects the incident vector `wi` about the normal `n`.
///
/// # Arguments
///
/// * `wi` - Incident direction (not necessarily normalised), ending up on the
///   point of incidence.
/// * `n` - The normal vector (must be normalised).
///
/// # Returns
///
/// `wi - 2 * dot(wi, n) * n`. The length of `wi` is preserved.
///
/// # Notes
///
/// The result does not depend on the orientation of `n`: flipping the normal
/// flips both factors of the projection.
#[must_use]
#[inline(always)]
pub fn reflect(wi: Vec3, n: Vec3) -> Vec3 { wi - 2.0 * wi.dot(n) * n }

/// Refracts the incident vector `wi` at a surface with normal `n` using the
/// relative index of refraction `eta`.
///
/// # Arguments
///
/// * `wi` - Incident direction (must be normalised), ending up on the point of
///   incidence.
/// * `n` - The normal vector (must be normalised).
/// * `eta` - Ratio of the refractive index of the incident medium over the
///   refractive index of the transmitted medium.
///
/// # Returns
///
/// The transmitted direction, or [`Vec3::ZERO`] in case of total internal
/// reflection (negative discriminant).
#[must_use]
#[inline(always)]
pub fn refract(wi: Vec3, n: Vec3, eta: f32) -> Vec3 {
    let cos_i = n.dot(wi);
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        Vec3::ZERO
    } else {
        eta * wi - (eta * cos_i + k.sqrt()) * n
    }
}
