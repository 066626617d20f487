//! The two demo scenes.

use crate::{
    camera::{OrbitControls, PerspectiveCamera},
    config::{RenderConfig, SceneKind},
    hit::{Cuboid, Sphere},
    material::{DirectionalLight, EnvBinding, Material, Phong},
    probe::CubeCamera,
    scene::{Object, Scene, SharedEnv},
    VisuError,
};
use base::{math::Vec3, FresnelParams, Rgba};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// A scene together with the camera looking at it.
pub struct Stage {
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
}

impl Stage {
    /// Moves the camera to its pose for the next frame: `orbit_step` degrees
    /// around the orbit target, then `dolly_factor` times its distance.
    pub fn advance(&mut self, orbit_step: f32, dolly_factor: f32) {
        self.controls
            .rotate(&mut self.camera, orbit_step.to_radians(), 0.0);
        self.controls.dolly(&mut self.camera, dolly_factor);
    }
}

pub fn build(config: &RenderConfig, background: SharedEnv) -> Result<Stage, VisuError> {
    let stage = match config.scene {
        SceneKind::Field => field(config, background),
        SceneKind::Probe => probe(config, background),
    };
    stage.scene.validate()?;
    log::info!(
        "Built {} scene: {} objects, {} lights, {} probes",
        config.scene,
        stage.scene.objects.len(),
        stage.scene.lights.len(),
        stage.scene.probes.len()
    );
    Ok(stage)
}

/// Fresnel spheres scattered at random in a 10000 units wide box.
fn field(config: &RenderConfig, background: SharedEnv) -> Stage {
    let mut camera = PerspectiveCamera::new(60.0, 1.0, 1.0, 100000.0);
    camera.position = Vec3::new(0.0, 0.0, 3200.0);
    let controls = OrbitControls::new(Vec3::new(0.0, 5.0, 0.0));
    controls.update(&mut camera);

    let params = config
        .fresnel
        .unwrap_or(FresnelParams::new(1.2, 0.1, 1.0, 1.0));
    let mut scene = Scene::new(background);
    let mut rng = StdRng::seed_from_u64(config.seed);
    for i in 0..config.sphere_count {
        let c = Vec3::new(
            rng.gen_range(-5000.0..5000.0),
            rng.gen_range(-5000.0..5000.0),
            rng.gen_range(-5000.0..5000.0),
        );
        let scale: f32 = rng.gen_range(1.0..4.0);
        scene.add(Object::new(
            format!("sphere-{i}"),
            Sphere::new(c, 100.0 * scale),
            Material::Fresnel {
                params,
                env: EnvBinding::Background,
            },
        ));
    }

    Stage {
        scene,
        camera,
        controls,
    }
}

/// A fresnel sphere reflecting a lit cube through a cube camera at its
/// centre.
fn probe(config: &RenderConfig, background: SharedEnv) -> Stage {
    let mut camera = PerspectiveCamera::new(45.0, 2.0, 0.1, 10000.0);
    camera.position = Vec3::new(0.0, 0.0, -200.0);
    let controls = OrbitControls::new(Vec3::new(0.0, 5.0, 0.0));
    controls.update(&mut camera);

    let mut scene = Scene::new(background);
    scene.add_light(DirectionalLight::from_position(
        Rgba::WHITE,
        1.0,
        Vec3::new(-1.0, 2.0, 4.0),
    ));
    scene.add(Object::new(
        "cube",
        Cuboid::cube(Vec3::new(75.0, 0.0, 0.0), 25.0),
        Material::Phong(Phong::new(Rgba::from_hex(0x88AACC))),
    ));

    let probe = scene.add_probe(CubeCamera::new(
        Vec3::ZERO,
        0.1,
        500.0,
        config.probe_resolution,
    ));
    let params = config
        .fresnel
        .unwrap_or(FresnelParams::new(1.02, 0.1, 1.0, 2.0));
    scene.add(Object::new(
        "sphere",
        Sphere::new(Vec3::ZERO, 50.0),
        Material::Fresnel {
            params,
            env: EnvBinding::Probe(probe),
        },
    ));

    Stage {
        scene,
        camera,
        controls,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base::envmap::Uniform;
    use std::sync::Arc;

    fn sky() -> SharedEnv { Arc::new(Uniform(Rgba::rgb(0.5, 0.6, 0.7))) }

    #[test]
    fn field_is_reproducible_and_bounded() {
        let config = RenderConfig::default();
        let a = build(&config, sky()).unwrap();
        let b = build(&config, sky()).unwrap();
        assert_eq!(a.scene.objects.len(), 50);
        assert_eq!(b.scene.objects.len(), 50);
        assert_eq!(a.camera.position, Vec3::new(0.0, 0.0, 3200.0));
        assert_eq!(a.camera.target(), Vec3::new(0.0, 5.0, 0.0));
        // Same seed, same first hit.
        let ray = crate::ray::Ray::new(Vec3::ZERO, Vec3::new(0.3, -0.2, 0.9).normalize());
        let ha = a.scene.hit(&ray, 0.0..=1e5).map(|(h, o)| (h.t, o.name.clone()));
        let hb = b.scene.hit(&ray, 0.0..=1e5).map(|(h, o)| (h.t, o.name.clone()));
        assert_eq!(ha, hb);
    }

    #[test]
    fn probe_scene_layout() {
        let config = RenderConfig {
            scene: SceneKind::Probe,
            probe_resolution: 8,
            ..Default::default()
        };
        let stage = build(&config, sky()).unwrap();
        assert_eq!(stage.scene.objects.len(), 2);
        assert_eq!(stage.scene.lights.len(), 1);
        assert_eq!(stage.scene.probes.len(), 1);
        assert_eq!(stage.scene.probes[0].resolution, 8);
        assert_eq!(stage.camera.fov, 45.0);
    }

    #[test]
    fn advance_orbits_and_dollies_the_camera() {
        let mut stage = build(&RenderConfig::default(), sky()).unwrap();
        let target = stage.controls.target;
        let before = (stage.camera.position - target).length();
        stage.advance(90.0, 0.5);
        let offset = stage.camera.position - target;
        assert!((offset.length() - 0.5 * before).abs() < 1e-2);
        // A quarter turn around +Y from +Z lands on +X.
        assert!(offset.x > 0.99 * offset.length());
        assert_eq!(stage.camera.target(), target);

        let pose = stage.camera.position;
        stage.advance(0.0, 1.0);
        assert!((stage.camera.position - pose).length() < 1e-2);
    }

    #[test]
    fn fresnel_override_is_validated() {
        let config = RenderConfig {
            sphere_count: 1,
            fresnel: Some(FresnelParams::new(0.0, 0.1, 1.0, 1.0)),
            ..Default::default()
        };
        assert!(matches!(
            build(&config, sky()),
            Err(VisuError::Material { .. })
        ));
    }
}
