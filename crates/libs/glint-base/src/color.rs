//! RGBA colour with floating point channels.

use serde::{Deserialize, Serialize};
use std::{
    fmt::{Debug, Display, Formatter},
    ops::{Add, Mul},
};

/// Linear RGBA colour, channels nominally in `[0, 1]`.
#[derive(Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a new colour.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self { Self { r, g, b, a } }

    /// Creates an opaque colour.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self { Self::new(r, g, b, 1.0) }

    /// Creates an opaque colour from a `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        Self::rgb(
            ((hex >> 16) & 0xFF) as f32 / 255.0,
            ((hex >> 8) & 0xFF) as f32 / 255.0,
            (hex & 0xFF) as f32 / 255.0,
        )
    }

    /// Returns the same colour with its alpha replaced.
    pub const fn with_alpha(self, a: f32) -> Self { Self { a, ..self } }

    /// Linear interpolation: `self * (1 - t) + other * t`.
    ///
    /// `t = 0` gives `self`, `t = 1` gives `other`.
    pub fn mix(self, other: Self, t: f32) -> Self { self * (1.0 - t) + other * t }

    /// Channel-wise product.
    pub fn modulate(self, other: Self) -> Self {
        Self::new(
            self.r * other.r,
            self.g * other.g,
            self.b * other.b,
            self.a * other.a,
        )
    }

    /// Clamps every channel into `[0, 1]`.
    pub fn saturate(self) -> Self {
        Self::new(
            crate::math::saturate(self.r),
            crate::math::saturate(self.g),
            crate::math::saturate(self.b),
            crate::math::saturate(self.a),
        )
    }

    /// Quantises to 8 bits per channel after clamping.
    pub fn to_rgba8(self) -> [u8; 4] {
        let c = self.saturate();
        [
            (c.r * 255.0 + 0.5) as u8,
            (c.g * 255.0 + 0.5) as u8,
            (c.b * 255.0 + 0.5) as u8,
            (c.a * 255.0 + 0.5) as u8,
        ]
    }
}

impl From<[f32; 4]> for Rgba {
    fn from(c: [f32; 4]) -> Self { Self::new(c[0], c[1], c[2], c[3]) }
}

impl Add for Rgba {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(
            self.r + rhs.r,
            self.g + rhs.g,
            self.b + rhs.b,
            self.a + rhs.a,
        )
    }
}

impl Mul<f32> for Rgba {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self::new(self.r * rhs, self.g * rhs, self.b * rhs, self.a * rhs)
    }
}

impl Debug for Rgba {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl Display for Rgba {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "{:?}", self) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mix_endpoints() {
        let a = Rgba::rgb(0.0, 1.0, 0.0);
        let b = Rgba::rgb(1.0, 0.0, 0.0);
        assert_eq!(a.mix(b, 0.0), a);
        assert_eq!(a.mix(b, 1.0), b);
        let m = a.mix(b, 0.25);
        assert_relative_eq!(m.r, 0.25);
        assert_relative_eq!(m.g, 0.75);
        assert_relative_eq!(m.a, 1.0);
    }

    #[test]
    fn from_hex_decodes_channels() {
        let c = Rgba::from_hex(0x88AACC);
        assert_relative_eq!(c.r, 136.0 / 255.0);
        assert_relative_eq!(c.g, 170.0 / 255.0);
        assert_relative_eq!(c.b, 204.0 / 255.0);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn to_rgba8_clamps() {
        assert_eq!(Rgba::new(2.0, -1.0, 0.5, 1.0).to_rgba8(), [255, 0, 128, 255]);
    }
}
