//! Math utilities.

pub use glam::*;

/// Clamps `x` into `[0, 1]`, mapping NaN to 0.
#[inline(always)]
pub fn saturate(x: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// Returns the index of the component of `v` with the largest magnitude.
///
/// Ties are resolved in the order x, y, z.
pub fn major_axis(v: Vec3) -> usize {
    let a = v.abs();
    if a.x >= a.y && a.x >= a.z {
        0
    } else if a.y >= a.z {
        1
    } else {
        2
    }
}
