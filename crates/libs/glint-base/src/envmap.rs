//! Directional colour lookups used as the surroundings of a shaded surface.
//!
//! The main implementation is [`CubeMap`], six square faces addressed with the
//! usual major-axis face selection. [`Uniform`], [`GradientSky`] and
//! [`FromFn`] cover constant, procedural and ad-hoc environments.

use crate::{
    color::Rgba,
    math::{major_axis, Vec3},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A directional colour lookup.
///
/// `dir` is expressed in the same (world) space as the positions and normals
/// fed to the shading model and does not need to be normalised.
/// Implementations must not rely on interior mutability if they are to be
/// shared across render workers.
pub trait EnvironmentMap {
    /// Returns the colour seen along `dir`.
    fn sample(&self, dir: Vec3) -> Rgba;
}

/// Errors raised while building a cube map.
#[derive(Debug, thiserror::Error)]
pub enum EnvMapError {
    /// A face image could not be read or decoded.
    #[error("Failed to load cube face '{}': {source}", path.display())]
    Image {
        /// Path of the face image.
        path: PathBuf,
        /// Underlying decoding error.
        source: image::ImageError,
    },
    /// A face is not square.
    #[error("Cube face {face:?} is not square ({width}x{height})")]
    NotSquare {
        /// The offending face.
        face: CubeFace,
        /// Width in texels.
        width: u32,
        /// Height in texels.
        height: u32,
    },
    /// The faces do not share the same size.
    #[error("Cube face {face:?} has size {actual}, expected {expected}")]
    SizeMismatch {
        /// The offending face.
        face: CubeFace,
        /// Size of the first face.
        expected: u32,
        /// Size of the offending face.
        actual: u32,
    },
    /// The faces have no texel at all.
    #[error("Cube map faces must not be empty")]
    Empty,
    /// The face size exceeds [`MAX_CUBE_SIZE`].
    #[error("Cube face size {0} exceeds the maximum of {}", MAX_CUBE_SIZE)]
    TooLarge(u32),
}

/// Largest accepted edge length of a cube map face, in texels.
pub const MAX_CUBE_SIZE: u32 = 16384;

/// Number of texels of a face of edge length `size`.
pub fn face_texel_count(size: u32) -> Result<usize, EnvMapError> {
    if size == 0 {
        return Err(EnvMapError::Empty);
    }
    if size > MAX_CUBE_SIZE {
        return Err(EnvMapError::TooLarge(size));
    }
    (size as usize)
        .checked_mul(size as usize)
        .ok_or(EnvMapError::TooLarge(size))
}

/// Face of a cube map, in the conventional storage order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CubeFace {
    /// Facing +X.
    PosX = 0,
    /// Facing -X.
    NegX = 1,
    /// Facing +Y.
    PosY = 2,
    /// Facing -Y.
    NegY = 3,
    /// Facing +Z.
    PosZ = 4,
    /// Facing -Z.
    NegZ = 5,
}

impl CubeFace {
    /// All faces in storage order (+X, -X, +Y, -Y, +Z, -Z).
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PosX,
        CubeFace::NegX,
        CubeFace::PosY,
        CubeFace::NegY,
        CubeFace::PosZ,
        CubeFace::NegZ,
    ];

    /// Index of the face in storage order.
    pub const fn index(self) -> usize { self as usize }

    /// Selects the face hit by `dir` and the face coordinates `(s, t)` in
    /// `[0, 1]`, `t` growing downwards.
    ///
    /// Returns `None` for a zero or non-finite direction.
    pub fn from_direction(dir: Vec3) -> Option<(CubeFace, f32, f32)> {
        if !dir.is_finite() {
            return None;
        }
        let (face, sc, tc, ma) = match major_axis(dir) {
            0 if dir.x >= 0.0 => (CubeFace::PosX, -dir.z, -dir.y, dir.x),
            0 => (CubeFace::NegX, dir.z, -dir.y, -dir.x),
            1 if dir.y >= 0.0 => (CubeFace::PosY, dir.x, dir.z, dir.y),
            1 => (CubeFace::NegY, dir.x, -dir.z, -dir.y),
            _ if dir.z >= 0.0 => (CubeFace::PosZ, dir.x, -dir.y, dir.z),
            _ => (CubeFace::NegZ, -dir.x, -dir.y, -dir.z),
        };
        if ma <= 0.0 {
            return None;
        }
        Some((face, 0.5 * (sc / ma + 1.0), 0.5 * (tc / ma + 1.0)))
    }

    /// Inverse of [`CubeFace::from_direction`]: the (unnormalised) direction
    /// through the face coordinates `(s, t)`.
    pub fn direction(self, s: f32, t: f32) -> Vec3 {
        let u = 2.0 * s - 1.0;
        let v = 2.0 * t - 1.0;
        match self {
            CubeFace::PosX => Vec3::new(1.0, -v, -u),
            CubeFace::NegX => Vec3::new(-1.0, -v, u),
            CubeFace::PosY => Vec3::new(u, 1.0, v),
            CubeFace::NegY => Vec3::new(u, -1.0, -v),
            CubeFace::PosZ => Vec3::new(u, -v, 1.0),
            CubeFace::NegZ => Vec3::new(-u, -v, -1.0),
        }
    }
}

/// Cube-mapped environment made of six square faces of equal size.
///
/// Texels are stored row by row, the first row being the top of the face.
#[derive(Clone)]
pub struct CubeMap {
    size: u32,
    faces: [Vec<Rgba>; 6],
}

impl CubeMap {
    /// Creates a cube map where every texel has the same colour.
    ///
    /// `size` is clamped into `[1, MAX_CUBE_SIZE]`.
    pub fn filled(size: u32, color: Rgba) -> Self {
        let size = size.clamp(1, MAX_CUBE_SIZE);
        let n = size as usize * size as usize;
        Self {
            size,
            faces: std::array::from_fn(|_| vec![color; n]),
        }
    }

    /// Creates a cube map from six faces of `size * size` texels each.
    pub fn from_faces(size: u32, faces: [Vec<Rgba>; 6]) -> Result<Self, EnvMapError> {
        let expected = face_texel_count(size)?;
        for (face, texels) in CubeFace::ALL.iter().zip(faces.iter()) {
            if texels.len() != expected {
                return Err(EnvMapError::SizeMismatch {
                    face: *face,
                    expected: size,
                    actual: (texels.len() as f64).sqrt() as u32,
                });
            }
        }
        Ok(Self { size, faces })
    }

    /// Loads a cube map from six image files ordered +X, -X, +Y, -Y, +Z, -Z.
    pub fn load<P: AsRef<Path>>(paths: &[P; 6]) -> Result<Self, EnvMapError> {
        let mut size = 0;
        let mut faces: [Vec<Rgba>; 6] = Default::default();
        for ((face, path), texels) in CubeFace::ALL.iter().zip(paths.iter()).zip(faces.iter_mut()) {
            let path = path.as_ref();
            let img = image::open(path)
                .map_err(|source| EnvMapError::Image {
                    path: path.to_path_buf(),
                    source,
                })?
                .to_rgba32f();
            let (w, h) = img.dimensions();
            if w != h {
                return Err(EnvMapError::NotSquare {
                    face: *face,
                    width: w,
                    height: h,
                });
            }
            if *face == CubeFace::PosX {
                face_texel_count(w)?;
                size = w;
            } else if w != size {
                return Err(EnvMapError::SizeMismatch {
                    face: *face,
                    expected: size,
                    actual: w,
                });
            }
            *texels = img.pixels().map(|p| Rgba::from(p.0)).collect();
            log::debug!("Loaded cube face {:?} ({}x{}) from {}", face, w, h, path.display());
        }
        Self::from_faces(size, faces)
    }

    /// Edge length of a face in texels.
    pub fn size(&self) -> u32 { self.size }

    /// Texels of a face.
    pub fn face(&self, face: CubeFace) -> &[Rgba] { &self.faces[face.index()] }

    /// Texel at column `x` and row `y` of a face.
    pub fn texel(&self, face: CubeFace, x: u32, y: u32) -> Rgba {
        self.faces[face.index()][y as usize * self.size as usize + x as usize]
    }

    /// Bilinear lookup at face coordinates `(s, t)`, clamped to the face
    /// edges.
    fn lookup(&self, face: CubeFace, s: f32, t: f32) -> Rgba {
        let n = self.size as f32;
        let max = self.size - 1;
        let x = (s * n - 0.5).clamp(0.0, max as f32);
        let y = (t * n - 0.5).clamp(0.0, max as f32);
        let (x0, y0) = (x.floor() as u32, y.floor() as u32);
        let (x1, y1) = ((x0 + 1).min(max), (y0 + 1).min(max));
        let (fx, fy) = (x - x0 as f32, y - y0 as f32);
        let top = self.texel(face, x0, y0).mix(self.texel(face, x1, y0), fx);
        let bottom = self.texel(face, x0, y1).mix(self.texel(face, x1, y1), fx);
        top.mix(bottom, fy)
    }
}

impl EnvironmentMap for CubeMap {
    /// Samples the face hit by `dir`; a zero or non-finite direction samples
    /// as opaque black.
    fn sample(&self, dir: Vec3) -> Rgba {
        match CubeFace::from_direction(dir) {
            Some((face, s, t)) => self.lookup(face, s, t),
            None => Rgba::BLACK,
        }
    }
}

/// Environment of a single colour.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Uniform(pub Rgba);

impl EnvironmentMap for Uniform {
    fn sample(&self, _dir: Vec3) -> Rgba { self.0 }
}

/// Environment defined by a closure, see [`from_fn`].
#[derive(Copy, Clone)]
pub struct FromFn<F>(F);

/// Creates an environment map from a closure `Fn(Vec3) -> Rgba`.
pub fn from_fn<F: Fn(Vec3) -> Rgba>(f: F) -> FromFn<F> { FromFn(f) }

impl<F: Fn(Vec3) -> Rgba> EnvironmentMap for FromFn<F> {
    fn sample(&self, dir: Vec3) -> Rgba { (self.0)(dir) }
}

/// Procedural sky: a vertical gradient from the ground to the zenith with a
/// sun disk.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct GradientSky {
    /// Colour straight up.
    pub zenith: Rgba,
    /// Colour at the horizon.
    pub horizon: Rgba,
    /// Colour straight down.
    pub ground: Rgba,
    /// Direction towards the sun.
    pub sun_dir: Vec3,
    /// Colour of the sun disk.
    pub sun: Rgba,
    /// Cosine of the angular radius of the sun disk.
    pub sun_cos: f32,
}

impl Default for GradientSky {
    fn default() -> Self {
        Self {
            zenith: Rgba::rgb(0.18, 0.36, 0.72),
            horizon: Rgba::rgb(0.85, 0.88, 0.92),
            ground: Rgba::rgb(0.24, 0.2, 0.16),
            sun_dir: Vec3::new(-1.0, 2.0, 4.0).normalize(),
            sun: Rgba::rgb(1.0, 0.96, 0.85),
            sun_cos: 0.9990,
        }
    }
}

impl EnvironmentMap for GradientSky {
    fn sample(&self, dir: Vec3) -> Rgba {
        let d = dir.normalize_or_zero();
        if d == Vec3::ZERO {
            return Rgba::BLACK;
        }
        if d.dot(self.sun_dir) >= self.sun_cos {
            return self.sun;
        }
        if d.y >= 0.0 {
            self.horizon.mix(self.zenith, d.y.sqrt())
        } else {
            self.horizon.mix(self.ground, (-d.y).sqrt())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn face_colors() -> CubeMap {
        let colors = [
            Rgba::rgb(1.0, 0.0, 0.0),
            Rgba::rgb(0.0, 1.0, 0.0),
            Rgba::rgb(0.0, 0.0, 1.0),
            Rgba::rgb(1.0, 1.0, 0.0),
            Rgba::rgb(0.0, 1.0, 1.0),
            Rgba::rgb(1.0, 0.0, 1.0),
        ];
        CubeMap::from_faces(2, colors.map(|c| vec![c; 4])).unwrap()
    }

    #[test]
    fn face_selection_follows_major_axis() {
        let cases = [
            (Vec3::new(2.0, 0.5, -0.3), CubeFace::PosX),
            (Vec3::new(-2.0, 0.5, -0.3), CubeFace::NegX),
            (Vec3::new(0.1, 3.0, 0.2), CubeFace::PosY),
            (Vec3::new(0.1, -3.0, 0.2), CubeFace::NegY),
            (Vec3::new(0.1, 0.2, 0.9), CubeFace::PosZ),
            (Vec3::new(0.1, 0.2, -0.9), CubeFace::NegZ),
        ];
        for (dir, expected) in cases {
            let (face, s, t) = CubeFace::from_direction(dir).unwrap();
            assert_eq!(face, expected, "{dir:?}");
            assert!((0.0..=1.0).contains(&s) && (0.0..=1.0).contains(&t));
        }
    }

    #[test]
    fn face_direction_inverts_selection() {
        for face in CubeFace::ALL {
            let dir = face.direction(0.3, 0.8);
            let (f, s, t) = CubeFace::from_direction(dir).unwrap();
            assert_eq!(f, face);
            assert_relative_eq!(s, 0.3, epsilon = 1e-6);
            assert_relative_eq!(t, 0.8, epsilon = 1e-6);
        }
    }

    #[test]
    fn zero_direction_samples_black() {
        assert!(CubeFace::from_direction(Vec3::ZERO).is_none());
        assert!(CubeFace::from_direction(Vec3::new(f32::NAN, 0.0, 1.0)).is_none());
        assert_eq!(face_colors().sample(Vec3::ZERO), Rgba::BLACK);
    }

    #[test]
    fn sample_returns_face_color() {
        let map = face_colors();
        assert_eq!(map.sample(Vec3::X), Rgba::rgb(1.0, 0.0, 0.0));
        assert_eq!(map.sample(-Vec3::Z), Rgba::rgb(1.0, 0.0, 1.0));
        assert_eq!(map.sample(Vec3::new(0.0, -5.0, 0.0)), Rgba::rgb(1.0, 1.0, 0.0));
    }

    #[test]
    fn bilinear_lookup_blends_neighbouring_texels() {
        let mut faces: [Vec<Rgba>; 6] = std::array::from_fn(|_| vec![Rgba::BLACK; 4]);
        // Left column white, right column black on +Z.
        faces[CubeFace::PosZ.index()] = vec![Rgba::WHITE, Rgba::BLACK, Rgba::WHITE, Rgba::BLACK];
        let map = CubeMap::from_faces(2, faces).unwrap();
        let centre = map.sample(Vec3::Z);
        assert_relative_eq!(centre.r, 0.5, epsilon = 1e-6);
        // Beyond the last texel centre the lookup clamps.
        let edge = map.sample(CubeFace::PosZ.direction(0.01, 0.5));
        assert_relative_eq!(edge.r, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn from_faces_rejects_bad_sizes() {
        let mut faces: [Vec<Rgba>; 6] = std::array::from_fn(|_| vec![Rgba::BLACK; 4]);
        faces[3] = vec![Rgba::BLACK; 9];
        assert!(matches!(
            CubeMap::from_faces(2, faces),
            Err(EnvMapError::SizeMismatch {
                face: CubeFace::NegY,
                expected: 2,
                actual: 3
            })
        ));
        assert!(matches!(
            CubeMap::from_faces(0, Default::default()),
            Err(EnvMapError::Empty)
        ));
    }

    #[test]
    fn oversized_faces_are_rejected_before_allocating() {
        assert!(matches!(
            CubeMap::from_faces(70_000, Default::default()),
            Err(EnvMapError::TooLarge(70_000))
        ));
        assert!(matches!(face_texel_count(u32::MAX), Err(EnvMapError::TooLarge(_))));
        assert_eq!(face_texel_count(MAX_CUBE_SIZE).unwrap(), 16384 * 16384);
        assert_eq!(CubeMap::filled(0, Rgba::BLACK).size(), 1);
    }

    /// Writes one PNG per face, `sizes[i]` being the (width, height) of face `i`.
    fn write_faces(dir: &Path, sizes: [(u32, u32); 6]) -> [PathBuf; 6] {
        const COLORS: [[u8; 4]; 6] = [
            [255, 0, 0, 255],
            [0, 255, 0, 255],
            [0, 0, 255, 255],
            [255, 255, 0, 255],
            [0, 255, 255, 255],
            [255, 0, 255, 255],
        ];
        let names = ["px.png", "nx.png", "py.png", "ny.png", "pz.png", "nz.png"];
        std::array::from_fn(|i| {
            let (w, h) = sizes[i];
            let path = dir.join(names[i]);
            image::RgbaImage::from_pixel(w, h, image::Rgba(COLORS[i]))
                .save(&path)
                .unwrap();
            path
        })
    }

    #[test]
    fn load_places_faces_in_storage_order() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_faces(dir.path(), [(2, 2); 6]);
        let map = CubeMap::load(&paths).unwrap();
        assert_eq!(map.size(), 2);
        let expected = face_colors();
        for face in CubeFace::ALL {
            assert_eq!(map.texel(face, 1, 0), expected.texel(face, 0, 0), "{face:?}");
        }
        assert_eq!(map.sample(Vec3::X), Rgba::rgb(1.0, 0.0, 0.0));
        assert_eq!(map.sample(-Vec3::Y), Rgba::rgb(1.0, 1.0, 0.0));
        assert_eq!(map.sample(-Vec3::Z), Rgba::rgb(1.0, 0.0, 1.0));
    }

    #[test]
    fn load_rejects_non_square_face() {
        let dir = tempfile::tempdir().unwrap();
        let mut sizes = [(2, 2); 6];
        sizes[2] = (2, 3);
        let paths = write_faces(dir.path(), sizes);
        assert!(matches!(
            CubeMap::load(&paths),
            Err(EnvMapError::NotSquare {
                face: CubeFace::PosY,
                width: 2,
                height: 3
            })
        ));
    }

    #[test]
    fn load_rejects_faces_of_different_sizes() {
        let dir = tempfile::tempdir().unwrap();
        let mut sizes = [(2, 2); 6];
        sizes[5] = (4, 4);
        let paths = write_faces(dir.path(), sizes);
        assert!(matches!(
            CubeMap::load(&paths),
            Err(EnvMapError::SizeMismatch {
                face: CubeFace::NegZ,
                expected: 2,
                actual: 4
            })
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let paths = ["/nonexistent/px.png"; 6];
        assert!(matches!(
            CubeMap::load(&paths),
            Err(EnvMapError::Image { .. })
        ));
    }

    #[test]
    fn gradient_sky_is_brighter_up_than_down() {
        let sky = GradientSky::default();
        assert_eq!(sky.sample(Vec3::Y), sky.zenith);
        assert_eq!(sky.sample(-Vec3::Y), sky.ground);
        assert_eq!(sky.sample(sky.sun_dir * 10.0), sky.sun);
        assert_eq!(sky.sample(Vec3::ZERO), Rgba::BLACK);
    }
}
