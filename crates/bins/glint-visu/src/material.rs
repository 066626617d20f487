use base::{math::Vec3, FresnelParams, Rgba};

/// Which environment a fresnel material reflects and refracts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvBinding {
    /// The scene background (skybox).
    Background,
    /// The latest capture of the cube camera at this index in the scene.
    Probe(usize),
}

#[derive(Clone, Copy, Debug)]
pub enum Material {
    /// Environment mapped reflection/refraction.
    Fresnel {
        params: FresnelParams,
        env: EnvBinding,
    },
    /// Blinn-Phong lit by the directional lights of the scene.
    Phong(Phong),
}

/// Light arriving from infinitely far away along a fixed direction.
#[derive(Clone, Copy, Debug)]
pub struct DirectionalLight {
    pub color: Rgba,
    pub intensity: f32,
    /// Normalised direction from the surface towards the light.
    pub dir: Vec3,
}

impl DirectionalLight {
    /// Creates a light shining from `position` towards the origin.
    pub fn from_position(color: Rgba, intensity: f32, position: Vec3) -> Self {
        DirectionalLight {
            color,
            intensity,
            dir: position.normalize_or_zero(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Phong {
    pub color: Rgba,
    pub specular: Rgba,
    pub shininess: f32,
}

impl Phong {
    pub fn new(color: Rgba) -> Self {
        Phong {
            color,
            specular: Rgba::from_hex(0x111111),
            shininess: 30.0,
        }
    }

    /// Diffuse plus specular contribution of `lights`; no ambient term.
    ///
    /// * `n` - Outward normal (normalised).
    /// * `to_eye` - Normalised direction from the surface to the viewer.
    pub fn shade(&self, n: Vec3, to_eye: Vec3, lights: &[DirectionalLight]) -> Rgba {
        let mut out = Rgba::new(0.0, 0.0, 0.0, 0.0);
        for light in lights {
            let n_dot_l = n.dot(light.dir).max(0.0);
            if n_dot_l == 0.0 {
                continue;
            }
            let irradiance = light.color * (light.intensity * n_dot_l);
            let h = (light.dir + to_eye).normalize_or_zero();
            let spec = n.dot(h).max(0.0).powf(self.shininess);
            out = out
                + irradiance.modulate(self.color)
                + irradiance.modulate(self.specular) * spec;
        }
        out.with_alpha(self.color.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn phong_is_black_when_facing_away_from_light() {
        let light = DirectionalLight::from_position(Rgba::WHITE, 1.0, Vec3::Y);
        let c = Phong::new(Rgba::from_hex(0x88AACC)).shade(-Vec3::Y, -Vec3::Y, &[light]);
        assert_eq!(c, Rgba::BLACK);
    }

    #[test]
    fn phong_diffuse_follows_cosine() {
        let light = DirectionalLight::from_position(Rgba::WHITE, 1.0, Vec3::new(1.0, 1.0, 0.0));
        let mut phong = Phong::new(Rgba::WHITE);
        phong.specular = Rgba::new(0.0, 0.0, 0.0, 0.0);
        let c = phong.shade(Vec3::Y, Vec3::Y, &[light]);
        assert_relative_eq!(c.r, std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-6);
        assert_eq!(c.a, 1.0);
    }
}
