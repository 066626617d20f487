use crate::{ray::Ray, scene::Scene};
use base::{
    envmap::{face_texel_count, CubeFace, CubeMap, EnvMapError},
    math::Vec3,
    Rgba,
};
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};
use std::sync::Arc;

/// Captures the scene around a point into a cube map, used as a live
/// environment by the materials bound to it.
pub struct CubeCamera {
    pub position: Vec3,
    pub near: f32,
    pub far: f32,
    /// Edge length of a captured face in texels.
    pub resolution: u32,
    /// Latest capture; opaque black until the first capture.
    pub map: Arc<CubeMap>,
}

impl CubeCamera {
    pub fn new(position: Vec3, near: f32, far: f32, resolution: u32) -> Self {
        CubeCamera {
            position,
            near,
            far,
            resolution,
            map: Arc::new(CubeMap::filled(1, Rgba::BLACK)),
        }
    }

    /// Renders the six faces of the scene seen from the camera position.
    pub fn capture(&self, scene: &Scene) -> Result<CubeMap, EnvMapError> {
        let res = self.resolution;
        let n = face_texel_count(res)?;
        let faces = CubeFace::ALL.map(|face| {
            let mut texels = vec![Rgba::BLACK; n];
            texels
                .par_chunks_mut(res as usize)
                .enumerate()
                .for_each(|(y, row)| {
                    let t = (y as f32 + 0.5) / res as f32;
                    for (x, texel) in row.iter_mut().enumerate() {
                        let s = (x as f32 + 0.5) / res as f32;
                        let ray = Ray::new(self.position, face.direction(s, t).normalize());
                        *texel = scene.radiance(&ray, self.near..=self.far);
                    }
                });
            texels
        });
        CubeMap::from_faces(res, faces)
    }
}
