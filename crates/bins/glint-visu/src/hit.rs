use crate::ray::Ray;
use base::math::Vec3;
use std::ops::RangeInclusive;

/// Intersection of a ray with a surface.
#[derive(Clone, Copy, Debug)]
pub struct Hit {
    /// Outward normal at the hit point (normalised).
    pub n: Vec3,
    /// Hit point.
    pub p: Vec3,
    /// Distance from the ray origin in units of the ray direction.
    pub t: f32,
}

impl Hit {
    pub fn new(ray: &Ray, t: f32, n: Vec3) -> Self {
        Hit {
            n,
            p: ray.at(t),
            t,
        }
    }
}

/// Something a ray can hit.
///
/// Surfaces are single-sided: only hits on the front face (the ray travelling
/// against the outward normal) are reported, so an observer inside a closed
/// shape does not see it.
pub trait Hittable: Send + Sync {
    fn hit(&self, ray: &Ray, t: RangeInclusive<f32>) -> Option<Hit>;
}

#[derive(Clone, Copy, Debug)]
pub struct Sphere {
    pub c: Vec3,
    pub r: f32,
}

impl Sphere {
    pub fn new(c: Vec3, r: f32) -> Self { Sphere { c, r } }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, t: RangeInclusive<f32>) -> Option<Hit> {
        let oc = ray.org - self.c;
        let a = ray.dir.length_squared();
        let half_b = oc.dot(ray.dir);
        let c = oc.length_squared() - self.r * self.r;
        let discriminant = half_b * half_b - a * c;

        if discriminant < 0.0 {
            return None;
        }

        // Nearest root only: the far root is where the ray leaves the sphere.
        let root = (-half_b - discriminant.sqrt()) / a;
        if !t.contains(&root) {
            return None;
        }

        let p = ray.at(root);
        Some(Hit::new(ray, root, (p - self.c) / self.r))
    }
}

/// Axis-aligned box.
#[derive(Clone, Copy, Debug)]
pub struct Cuboid {
    pub c: Vec3,
    pub half: Vec3,
}

impl Cuboid {
    /// Creates a cube of edge length `size` centred at `c`.
    pub fn cube(c: Vec3, size: f32) -> Self {
        Cuboid {
            c,
            half: Vec3::splat(size * 0.5),
        }
    }
}

impl Hittable for Cuboid {
    fn hit(&self, ray: &Ray, t: RangeInclusive<f32>) -> Option<Hit> {
        let inv = ray.dir.recip();
        let t0 = (self.c - self.half - ray.org) * inv;
        let t1 = (self.c + self.half - ray.org) * inv;
        let near = t0.min(t1);
        let far = t0.max(t1);
        let t_enter = near.max_element();
        let t_exit = far.min_element();

        if t_enter > t_exit || !t.contains(&t_enter) {
            return None;
        }

        let axis = if t_enter == near.x {
            Vec3::X
        } else if t_enter == near.y {
            Vec3::Y
        } else {
            Vec3::Z
        };
        let n = -axis * ray.dir.dot(axis).signum();
        Some(Hit::new(ray, t_enter, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sphere_front_hit() {
        let s = Sphere::new(Vec3::new(0.0, 0.0, -10.0), 2.0);
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        let hit = s.hit(&ray, 0.0..=f32::INFINITY).unwrap();
        assert_relative_eq!(hit.t, 8.0);
        assert_eq!(hit.n, Vec3::Z);
        assert_eq!(hit.p, Vec3::new(0.0, 0.0, -8.0));
    }

    #[test]
    fn sphere_is_invisible_from_inside() {
        let s = Sphere::new(Vec3::ZERO, 50.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(s.hit(&ray, 0.1..=500.0).is_none());
    }

    #[test]
    fn sphere_respects_range() {
        let s = Sphere::new(Vec3::new(0.0, 0.0, -10.0), 2.0);
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        assert!(s.hit(&ray, 0.0..=5.0).is_none());
        assert!(s.hit(&Ray::new(Vec3::ZERO, Vec3::Z), 0.0..=100.0).is_none());
    }

    #[test]
    fn cube_hit_reports_face_normal() {
        let b = Cuboid::cube(Vec3::new(75.0, 0.0, 0.0), 25.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let hit = b.hit(&ray, 0.0..=1000.0).unwrap();
        assert_relative_eq!(hit.t, 62.5);
        assert_eq!(hit.n, -Vec3::X);

        let ray = Ray::new(Vec3::new(75.0, 100.0, 0.0), -Vec3::Y);
        let hit = b.hit(&ray, 0.0..=1000.0).unwrap();
        assert_relative_eq!(hit.t, 87.5);
        assert_eq!(hit.n, Vec3::Y);
    }

    #[test]
    fn cube_miss_and_inside() {
        let b = Cuboid::cube(Vec3::ZERO, 2.0);
        assert!(b.hit(&Ray::new(Vec3::new(0.0, 5.0, 5.0), Vec3::X), 0.0..=100.0).is_none());
        assert!(b.hit(&Ray::new(Vec3::ZERO, Vec3::X), 0.0..=100.0).is_none());
    }
}
