//! Soft drop shadows, rasterised once and blitted every frame.

use crate::geometry::{Point, Rect, lerp};
use crate::surface::{Bitmap, Surface, SurfaceError};

/// Alpha of the shadow at its darkest.
pub const SHADOW_ALPHA: u8 = 32;

/// A cached radial-gradient bitmap together with how to place it.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowImage {
    bitmap: Bitmap,
    radius: f64,
    inset: f64,
    offset: f64,
}

impl ShadowImage {
    /// Disc shadow under a button of `button_radius`. `None` when there is no
    /// elevation.
    pub fn for_button(button_radius: f64, elevation: f64) -> Option<Self> {
        if elevation <= 0.0 || button_radius <= 0.0 {
            return None;
        }
        let radius = (elevation * 2.0).floor();
        let bitmap_radius = button_radius.floor() + (radius / 2.0).floor();
        let size = (bitmap_radius * 2.0) as u32;
        let inner_stop = ((button_radius - radius / 2.0) / bitmap_radius).clamp(0.0, 1.0);

        log::trace!("rasterising {size}px button shadow");
        Some(Self {
            bitmap: radial_gradient(size, bitmap_radius, inner_stop),
            radius,
            inset: 0.0,
            offset: elevation / 2.0,
        })
    }

    /// Nine-patch source for a rectangular panel shadow. `None` when there is
    /// no elevation.
    pub fn for_menu(elevation: f64) -> Option<Self> {
        let radius = (elevation * 2.0).floor();
        if radius <= 0.0 {
            return None;
        }
        let size = radius as u32 * 2 + 1;

        log::trace!("rasterising {size}px menu shadow");
        Some(Self {
            bitmap: radial_gradient(size, radius, 0.0),
            radius,
            inset: (radius / 2.0).floor(),
            offset: (elevation / 2.0).floor(),
        })
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Blits the whole image centered under `center`, shifted down by the
    /// elevation offset.
    pub fn draw_centered(
        &self,
        surface: &mut dyn Surface,
        center: Point,
        alpha: f64,
    ) -> Result<(), SurfaceError> {
        let half_w = self.bitmap.width() as f64 / 2.0;
        let half_h = self.bitmap.height() as f64 / 2.0;
        let dst = Rect::new(
            center.x - half_w,
            center.y - half_h,
            center.x + half_w,
            center.y + half_h,
        )
        .offset(0.0, self.offset);
        surface.draw_bitmap(&self.bitmap, self.bitmap.bounds(), dst, alpha)
    }

    /// Stretches the image around `rect` as a nine-patch.
    pub fn draw_around(
        &self,
        surface: &mut dyn Surface,
        rect: Rect,
        alpha: f64,
    ) -> Result<(), SurfaceError> {
        let grow = self.radius - self.inset;
        let outer = rect.inset(-grow, -grow).offset(0.0, self.offset);
        for (src, dst) in nine_patch(outer, &self.bitmap, self.radius) {
            surface.draw_bitmap(&self.bitmap, src, dst, alpha)?;
        }
        Ok(())
    }
}

/// Splits `bitmap` into corners of `corner` px, edges and a center, and maps
/// each piece onto the matching part of `dst`. Returns `(src, dst)` pairs.
pub fn nine_patch(dst: Rect, bitmap: &Bitmap, corner: f64) -> [(Rect, Rect); 9] {
    let w = bitmap.width() as f64;
    let h = bitmap.height() as f64;
    let src_x = [0.0, corner, w - corner, w];
    let src_y = [0.0, corner, h - corner, h];
    let dst_x = [dst.left, dst.left + corner, dst.right - corner, dst.right];
    let dst_y = [dst.top, dst.top + corner, dst.bottom - corner, dst.bottom];

    std::array::from_fn(|i| {
        let (col, row) = (i % 3, i / 3);
        (
            Rect::new(src_x[col], src_y[row], src_x[col + 1], src_y[row + 1]),
            Rect::new(dst_x[col], dst_y[row], dst_x[col + 1], dst_y[row + 1]),
        )
    })
}

/// Black radial gradient filling a `size` square: [`SHADOW_ALPHA`] up to
/// `inner_stop * radius` from the center, fading to nothing at `radius`.
fn radial_gradient(size: u32, radius: f64, inner_stop: f64) -> Bitmap {
    let mut bitmap = Bitmap::new(size, size);
    let center = size as f64 / 2.0;
    let center = Point::new(center, center);

    for y in 0..size {
        for x in 0..size {
            let d = Point::new(x as f64 + 0.5, y as f64 + 0.5).distance(center) / radius;
            let alpha = if d <= inner_stop {
                SHADOW_ALPHA as f64
            } else if d >= 1.0 {
                0.0
            } else {
                lerp(SHADOW_ALPHA as f64, 0.0, (d - inner_stop) / (1.0 - inner_stop))
            };
            bitmap.set_pixel(x, y, [0, 0, 0, alpha.round() as u8]);
        }
    }
    bitmap
}
