use crate::ray::Ray;
use base::math::Vec3;
use std::{f32::consts::PI, ops::RangeInclusive};

/// Pinhole camera with a vertical field of view.
///
/// Right-handed, Y-up: the camera looks at `target` with `up` roughly pointing
/// to the top of the image.
#[derive(Clone, Copy, Debug)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Image width to height ratio.
    pub aspect: f32,
    /// Closest distance at which surfaces are visible.
    pub near: f32,
    /// Farthest distance at which surfaces are visible.
    pub far: f32,
    pub position: Vec3,
    pub up: Vec3,
    target: Vec3,
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        PerspectiveCamera {
            fov,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
            up: Vec3::Y,
            target: -Vec3::Z,
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) { self.aspect = aspect; }

    pub fn look_at(&mut self, target: Vec3) { self.target = target; }

    pub fn target(&self) -> Vec3 { self.target }

    /// Visible distance range along a normalised ray.
    pub fn clip_range(&self) -> RangeInclusive<f32> { self.near..=self.far }

    /// Orthonormal basis `(right, up, forward)` of the camera.
    fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = (self.target - self.position).normalize_or_zero();
        let right = forward.cross(self.up).normalize_or_zero();
        let up = right.cross(forward);
        (right, up, forward)
    }

    /// Generates the ray through pixel `(x, y)` of a `w * h` image, `(0, 0)`
    /// being the top left corner. Pixel centres are at half-integer offsets.
    pub fn primary_ray(&self, x: u32, y: u32, w: u32, h: u32) -> Ray {
        let (right, up, forward) = self.basis();
        let half_h = (self.fov.to_radians() * 0.5).tan();
        let half_w = self.aspect * half_h;
        let u = (2.0 * (x as f32 + 0.5) / w as f32 - 1.0) * half_w;
        let v = (1.0 - 2.0 * (y as f32 + 0.5) / h as f32) * half_h;
        Ray::new(
            self.position,
            (forward + u * right + v * up).normalize_or_zero(),
        )
    }
}

/// Orbits a camera around a target point, keeping it aimed at the target.
#[derive(Clone, Copy, Debug)]
pub struct OrbitControls {
    pub target: Vec3,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Smallest angle from the +Y axis, in radians.
    pub min_polar: f32,
    /// Largest angle from the +Y axis, in radians.
    pub max_polar: f32,
}

const POLAR_EPS: f32 = 1e-6;

impl OrbitControls {
    pub fn new(target: Vec3) -> Self {
        OrbitControls {
            target,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar: 0.0,
            max_polar: PI,
        }
    }

    /// Aims `camera` at the target.
    pub fn update(&self, camera: &mut PerspectiveCamera) { camera.look_at(self.target); }

    /// Rotates `camera` around the target by `d_azimuth` around the +Y axis
    /// and `d_polar` away from it, both in radians.
    pub fn rotate(&self, camera: &mut PerspectiveCamera, d_azimuth: f32, d_polar: f32) {
        let offset = camera.position - self.target;
        let radius = offset.length();
        if radius == 0.0 {
            self.update(camera);
            return;
        }
        let azimuth = offset.x.atan2(offset.z) + d_azimuth;
        let polar = ((offset.y / radius).clamp(-1.0, 1.0).acos() + d_polar).clamp(
            self.min_polar.max(POLAR_EPS),
            self.max_polar.min(PI - POLAR_EPS),
        );
        camera.position = self.target + spherical_to_offset(radius, polar, azimuth);
        self.update(camera);
    }

    /// Moves `camera` along the line to the target, scaling the distance by
    /// `factor` within the distance bounds.
    pub fn dolly(&self, camera: &mut PerspectiveCamera, factor: f32) {
        let offset = camera.position - self.target;
        let radius = offset.length();
        if radius == 0.0 {
            return;
        }
        let new_radius = (radius * factor).clamp(self.min_distance, self.max_distance);
        camera.position = self.target + offset * (new_radius / radius);
        self.update(camera);
    }
}

fn spherical_to_offset(radius: f32, polar: f32, azimuth: f32) -> Vec3 {
    let sin_polar = polar.sin();
    Vec3::new(
        radius * sin_polar * azimuth.sin(),
        radius * polar.cos(),
        radius * sin_polar * azimuth.cos(),
    )
}
