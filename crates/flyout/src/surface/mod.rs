//! The drawing contract the menu renders against.
//!
//! Hosts implement [`Surface`] over whatever 2D API they have. Clips are
//! intersected with the current clip and, like transforms, are scoped by
//! [`Surface::save`]/[`Surface::restore`].

#[cfg(feature = "cairo")]
mod cairo_context;
pub mod recording;

use crate::color::Color;
use crate::geometry::{Point, Rect};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("Drawing backend error: {0}")]
    Backend(String),
    #[error("Unbalanced restore without a matching save")]
    UnbalancedRestore,
    #[cfg(feature = "cairo")]
    #[error(transparent)]
    Cairo(#[from] ::cairo::Error),
}

pub trait Surface {
    fn save(&mut self) -> Result<(), SurfaceError>;
    fn restore(&mut self) -> Result<(), SurfaceError>;

    fn translate(&mut self, dx: f64, dy: f64);
    fn scale(&mut self, sx: f64, sy: f64);

    fn clip_rect(&mut self, rect: Rect);
    fn clip_round_rect(&mut self, rect: Rect, radius: f64);
    fn clip_oval(&mut self, bounds: Rect);

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), SurfaceError>;
    fn fill_round_rect(&mut self, rect: Rect, radius: f64, color: Color) -> Result<(), SurfaceError>;
    fn fill_oval(&mut self, bounds: Rect, color: Color) -> Result<(), SurfaceError>;
    fn stroke_oval(&mut self, bounds: Rect, width: f64, color: Color) -> Result<(), SurfaceError>;

    /// Blits the `src` region of `bitmap` scaled into `dst`.
    fn draw_bitmap(
        &mut self,
        bitmap: &Bitmap,
        src: Rect,
        dst: Rect,
        alpha: f64,
    ) -> Result<(), SurfaceError>;

    /// Draws `text` centered on `center`.
    fn fill_text(&mut self, text: &str, center: Point, size: f64, color: Color) -> Result<(), SurfaceError>;

    /// Scales about `center` rather than the origin.
    fn scale_about(&mut self, center: Point, factor: f64) {
        self.translate(center.x, center.y);
        self.scale(factor, factor);
        self.translate(-center.x, -center.y);
    }
}

/// Runs `draw` between a save and a restore. The restore happens even when
/// `draw` fails, and the first error wins.
pub fn with_saved_state<F>(surface: &mut dyn Surface, draw: F) -> Result<(), SurfaceError>
where
    F: FnOnce(&mut dyn Surface) -> Result<(), SurfaceError>,
{
    surface.save()?;
    let drawn = draw(surface);
    let restored = surface.restore();
    drawn.and(restored)
}

/// Backend copy of a bitmap, built on its first blit. Never shared between
/// clones and ignored by equality.
#[cfg(feature = "cairo")]
#[derive(Default)]
struct ImageCache(std::cell::OnceCell<::cairo::ImageSurface>);

#[cfg(feature = "cairo")]
impl Clone for ImageCache {
    fn clone(&self) -> Self {
        Self::default()
    }
}

#[cfg(feature = "cairo")]
impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ImageCache")
            .field(&self.0.get().is_some())
            .finish()
    }
}

#[cfg(feature = "cairo")]
impl PartialEq for ImageCache {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

#[cfg(feature = "cairo")]
impl Eq for ImageCache {}

/// Straight (non-premultiplied) RGBA pixels, row-major without padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    #[cfg(feature = "cairo")]
    image: ImageCache,
}

impl Bitmap {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
            #[cfg(feature = "cairo")]
            image: ImageCache::default(),
        }
    }

    /// Returns `None` unless `pixels` holds exactly `width * height` RGBA pixels.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        (pixels.len() == width as usize * height as usize * 4).then_some(Self {
            width,
            height,
            pixels,
            #[cfg(feature = "cairo")]
            image: ImageCache::default(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f64, self.height as f64)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x < self.width && y < self.height {
            let i = (y as usize * self.width as usize + x as usize) * 4;
            self.pixels[i..i + 4].copy_from_slice(&rgba);
            #[cfg(feature = "cairo")]
            self.image.0.take();
        }
    }
}
