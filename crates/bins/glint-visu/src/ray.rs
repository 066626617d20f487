use base::math::Vec3;

/// A half-line starting at `org` going along `dir`.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub org: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(org: Vec3, dir: Vec3) -> Self { Ray { org, dir } }

    pub fn at(&self, t: f32) -> Vec3 { self.org + t * self.dir }
}
