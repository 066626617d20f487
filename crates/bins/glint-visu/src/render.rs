use crate::{camera::PerspectiveCamera, scene::Scene, VisuError};
use image::RgbaImage;
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Size of the drawing surface the frames are rendered at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Adopts the display size if it differs from the current one.
    ///
    /// Returns `true` if the viewport was resized, in which case the camera
    /// projection must be updated.
    pub fn resize_to_display_size(&mut self, width: u32, height: u32) -> bool {
        let need_resize = self.width != width || self.height != height;
        if need_resize {
            self.width = width;
            self.height = height;
        }
        need_resize
    }

    pub fn aspect(&self) -> f32 { self.width as f32 / self.height.max(1) as f32 }
}

/// Converts an RGBA pixel to a 32-bit unsigned integer in format 0xAABBGGRR.
#[inline(always)]
pub const fn rgba_to_u32(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (a as u32) << 24 | (b as u32) << 16 | (g as u32) << 8 | r as u32
}

/// A mutable tile in a tiled image.
pub struct TileMut<'a> {
    /// The index of the tile in the tiled image.
    pub idx: u32,
    /// The x coordinate of the first pixel of the tile in the image.
    pub x: u32,
    /// The y coordinate of the first pixel of the tile in the image.
    pub y: u32,
    /// The width of the tile in pixels.
    pub w: u32,
    /// The height of the tile in pixels.
    pub h: u32,
    /// The underlying pixel buffer, in RGBA format, in row-major order.
    pub pixels: &'a mut [u32],
}

/// An image that is decomposed into smaller tiles for parallel processing.
///
/// Tiles and pixels inside tiles are stored in a flat array in row-major order.
/// Tiles on the right and bottom borders may stick out of the image; those
/// pixels are never written to the output.
pub struct TiledImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Pixel edge length of a tile.
    pub tile_size: u32,
    /// Number of tiles in the x direction.
    pub tiles_per_row: u32,
    /// Number of tiles in the y direction.
    pub tiles_per_col: u32,
    /// Underlying pixel buffer.
    pub pixels: Vec<u32>,
}

impl Default for TiledImage {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            tile_size: 1,
            tiles_per_row: 0,
            tiles_per_col: 0,
            pixels: Vec::new(),
        }
    }
}

impl TiledImage {
    /// Allocates a cleared image, or returns `None` if its pixel buffer
    /// cannot be addressed.
    pub fn new(width: u32, height: u32, tile_size: u32) -> Option<Self> {
        let tile_size = tile_size.max(1);
        let tiles_per_row = width.div_ceil(tile_size);
        let tiles_per_col = height.div_ceil(tile_size);
        let n = (tiles_per_row as usize)
            .checked_mul(tiles_per_col as usize)?
            .checked_mul(tile_size as usize)?
            .checked_mul(tile_size as usize)?;
        if n.checked_mul(std::mem::size_of::<u32>())? > isize::MAX as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            tile_size,
            tiles_per_row,
            tiles_per_col,
            pixels: vec![0; n],
        })
    }

    pub fn pixels_per_tile(&self) -> usize { self.tile_size as usize * self.tile_size as usize }

    /// Pixel at `(x, y)` in image coordinates.
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        let ts = self.tile_size as usize;
        let (x, y) = (x as usize, y as usize);
        let tile_idx = (y / ts) * self.tiles_per_row as usize + x / ts;
        let offset = tile_idx * self.pixels_per_tile() + (y % ts) * ts + x % ts;
        self.pixels[offset]
    }

    pub fn par_tiles_mut(&mut self) -> impl ParallelIterator<Item = TileMut<'_>> {
        let tiles_per_row = self.tiles_per_row;
        let tile_size = self.tile_size;
        let chunk = self.pixels_per_tile();
        self.pixels
            .par_chunks_mut(chunk)
            .enumerate()
            .map(move |(idx, pixels)| TileMut {
                idx: idx as u32,
                x: (idx as u32 % tiles_per_row) * tile_size,
                y: (idx as u32 / tiles_per_row) * tile_size,
                w: tile_size,
                h: tile_size,
                pixels,
            })
    }

    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(self.pixel(x, y).to_le_bytes())
        })
    }
}

/// Drives the per-frame work: resize handling, probe updates and the tile
/// parallel rendering of the camera view.
pub struct Renderer {
    viewport: Viewport,
    image: TiledImage,
    tile_size: u32,
}

impl Renderer {
    pub fn new(tile_size: u32) -> Self {
        Renderer {
            viewport: Viewport::default(),
            image: TiledImage::default(),
            tile_size,
        }
    }

    pub fn viewport(&self) -> Viewport { self.viewport }

    /// Renders one frame of `scene` seen by `camera` on a display of
    /// `display` pixels.
    pub fn frame(
        &mut self,
        scene: &mut Scene,
        camera: &mut PerspectiveCamera,
        display: (u32, u32),
    ) -> Result<RgbaImage, VisuError> {
        if self
            .viewport
            .resize_to_display_size(display.0, display.1)
        {
            self.image = match TiledImage::new(display.0, display.1, self.tile_size) {
                Some(image) => image,
                None => {
                    self.viewport = Viewport::default();
                    return Err(VisuError::InvalidConfig(format!(
                        "a {}x{} frame with {}px tiles is too large",
                        display.0, display.1, self.tile_size
                    )));
                },
            };
            camera.set_aspect(self.viewport.aspect());
            log::debug!(
                "Viewport resized to {}x{}, aspect {:.3}",
                display.0,
                display.1,
                camera.aspect
            );
        }
        scene.update_probes()?;

        let (w, h) = (self.viewport.width, self.viewport.height);
        let camera = &*camera;
        let scene = &*scene;
        self.image.par_tiles_mut().for_each(|tile| {
            for j in 0..tile.h {
                let y = tile.y + j;
                if y >= h {
                    break;
                }
                for i in 0..tile.w {
                    let x = tile.x + i;
                    if x >= w {
                        break;
                    }
                    let ray = camera.primary_ray(x, y, w, h);
                    let [r, g, b, _] = scene.radiance(&ray, camera.clip_range()).to_rgba8();
                    let offset = j as usize * tile.w as usize + i as usize;
                    tile.pixels[offset] = rgba_to_u32(r, g, b, 255);
                }
            }
        });
        Ok(self.image.to_image())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_reports_size_changes_once() {
        let mut viewport = Viewport::default();
        assert!(viewport.resize_to_display_size(640, 480));
        assert!(!viewport.resize_to_display_size(640, 480));
        assert!(viewport.resize_to_display_size(800, 480));
        assert_eq!(viewport.aspect(), 800.0 / 480.0);
    }

    #[test]
    fn tiled_image_addresses_pixels_across_tiles() {
        let mut image = TiledImage::new(5, 3, 2).unwrap();
        assert_eq!(image.tiles_per_row, 3);
        assert_eq!(image.tiles_per_col, 2);
        image.par_tiles_mut().for_each(|tile| {
            for j in 0..tile.h {
                for i in 0..tile.w {
                    let offset = j as usize * tile.w as usize + i as usize;
                    tile.pixels[offset] = (tile.y + j) * 100 + tile.x + i;
                }
            }
        });
        assert_eq!(image.pixel(4, 2), 204);
        assert_eq!(image.pixel(3, 0), 3);
        let out = image.to_image();
        assert_eq!(out.dimensions(), (5, 3));
        assert_eq!(out.get_pixel(1, 1).0, 101u32.to_le_bytes());
    }

    #[test]
    fn frame_resizes_and_renders_background() {
        use base::{envmap::Uniform, Rgba};
        use std::sync::Arc;

        let mut scene = Scene::new(Arc::new(Uniform(Rgba::rgb(1.0, 0.0, 1.0))));
        let mut camera = PerspectiveCamera::new(60.0, 1.0, 1.0, 100.0);
        let mut renderer = Renderer::new(4);
        let img = renderer.frame(&mut scene, &mut camera, (10, 5)).unwrap();
        assert_eq!(img.dimensions(), (10, 5));
        assert_eq!(camera.aspect, 2.0);
        assert_eq!(renderer.viewport(), Viewport { width: 10, height: 5 });
        assert!(img.pixels().all(|p| p.0 == [255, 0, 255, 255]));

        // Same display size: no resize, aspect left alone.
        camera.set_aspect(3.0);
        renderer.frame(&mut scene, &mut camera, (10, 5)).unwrap();
        assert_eq!(camera.aspect, 3.0);
    }

    #[test]
    fn unaddressable_frames_are_rejected() {
        assert!(TiledImage::new(u32::MAX, u32::MAX, 1).is_none());
        assert!(TiledImage::new(u32::MAX, u32::MAX, u32::MAX).is_none());

        let mut scene = Scene::new(std::sync::Arc::new(base::envmap::Uniform(base::Rgba::WHITE)));
        let mut camera = PerspectiveCamera::new(60.0, 1.0, 1.0, 100.0);
        let mut renderer = Renderer::new(32);
        assert!(matches!(
            renderer.frame(&mut scene, &mut camera, (u32::MAX, u32::MAX)),
            Err(VisuError::InvalidConfig(_))
        ));
        assert_eq!(renderer.viewport(), Viewport::default());
        assert_eq!(camera.aspect, 1.0);
    }

    #[test]
    fn packs_rgba_little_endian() {
        assert_eq!(rgba_to_u32(1, 2, 3, 4).to_le_bytes(), [1, 2, 3, 4]);
    }
}
