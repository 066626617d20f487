use crate::{
    hit::{Hit, Hittable},
    material::{DirectionalLight, EnvBinding, Material},
    probe::CubeCamera,
    ray::Ray,
    VisuError,
};
use base::{
    envmap::{EnvMapError, EnvironmentMap},
    fresnel::{shade, SurfacePoint, ViewContext},
    Rgba,
};
use std::{ops::RangeInclusive, sync::Arc};

/// Environment shared by the render workers.
pub type SharedEnv = Arc<dyn EnvironmentMap + Send + Sync>;

pub struct Object {
    pub name: String,
    pub shape: Box<dyn Hittable>,
    pub material: Material,
}

impl Object {
    pub fn new(name: impl Into<String>, shape: impl Hittable + 'static, material: Material) -> Self {
        Object {
            name: name.into(),
            shape: Box::new(shape),
            material,
        }
    }
}

/// Flat list of objects, lights and cube cameras in front of a background.
pub struct Scene {
    pub objects: Vec<Object>,
    pub lights: Vec<DirectionalLight>,
    pub probes: Vec<CubeCamera>,
    pub background: SharedEnv,
}

impl Scene {
    pub fn new(background: SharedEnv) -> Self {
        Scene {
            objects: Vec::new(),
            lights: Vec::new(),
            probes: Vec::new(),
            background,
        }
    }

    pub fn add(&mut self, object: Object) { self.objects.push(object); }

    pub fn add_light(&mut self, light: DirectionalLight) { self.lights.push(light); }

    /// Adds a cube camera and returns the index to bind materials to.
    pub fn add_probe(&mut self, probe: CubeCamera) -> usize {
        self.probes.push(probe);
        self.probes.len() - 1
    }

    /// Checks the fresnel parameters and probe bindings of every material.
    pub fn validate(&self) -> Result<(), VisuError> {
        for object in &self.objects {
            if let Material::Fresnel { params, env } = &object.material {
                params.validate().map_err(|source| VisuError::Material {
                    object: object.name.clone(),
                    source,
                })?;
                if let EnvBinding::Probe(idx) = env {
                    if *idx >= self.probes.len() {
                        return Err(VisuError::InvalidConfig(format!(
                            "object '{}' is bound to missing probe #{}",
                            object.name, idx
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Closest front-facing hit within `t`.
    pub fn hit(&self, ray: &Ray, t: RangeInclusive<f32>) -> Option<(Hit, &Object)> {
        let mut closest_so_far = *t.end();
        let mut hit = None;

        for object in &self.objects {
            if let Some(temp_hit) = object.shape.hit(ray, *t.start()..=closest_so_far) {
                closest_so_far = temp_hit.t;
                hit = Some((temp_hit, object));
            }
        }
        hit
    }

    pub fn env(&self, binding: EnvBinding) -> &dyn EnvironmentMap {
        match binding {
            EnvBinding::Probe(idx) if idx < self.probes.len() => &*self.probes[idx].map,
            _ => &*self.background,
        }
    }

    /// Colour seen along `ray`, the ray origin being the eye.
    pub fn radiance(&self, ray: &Ray, t: RangeInclusive<f32>) -> Rgba {
        let Some((hit, object)) = self.hit(ray, t) else {
            return self.background.sample(ray.dir);
        };
        match &object.material {
            Material::Fresnel { params, env } => shade(
                SurfacePoint::new(hit.p, hit.n),
                ViewContext::new(ray.org),
                *params,
                self.env(*env),
            )
            .unwrap_or_else(|err| {
                log::trace!("{}: {}", object.name, err);
                self.background.sample(ray.dir)
            }),
            Material::Phong(phong) => phong.shade(hit.n, -ray.dir.normalize_or_zero(), &self.lights),
        }
    }

    /// Re-captures every cube camera; each capture sees the previous captures
    /// of the other probes.
    pub fn update_probes(&mut self) -> Result<(), EnvMapError> {
        for i in 0..self.probes.len() {
            let map = self.probes[i].capture(self)?;
            self.probes[i].map = Arc::new(map);
        }
        Ok(())
    }
}
