use super::{Bitmap, Surface, SurfaceError};
use crate::color::Color;
use crate::geometry::{Point, Rect};
use ::cairo::{Context, Extend, Filter, FontSlant, FontWeight, Format, ImageSurface};
use std::f64::consts::PI;

fn set_color(cr: &Context, color: Color) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

fn oval_path(cr: &Context, bounds: Rect) {
    cr.new_path();
    if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
        return;
    }
    let center = bounds.center();
    let matrix = cr.matrix();
    cr.translate(center.x, center.y);
    cr.scale(bounds.width() / 2.0, bounds.height() / 2.0);
    cr.arc(0.0, 0.0, 1.0, 0.0, 2.0 * PI);
    cr.set_matrix(matrix);
}

fn round_rect_path(cr: &Context, rect: Rect, radius: f64) {
    let r = radius.min(rect.width() / 2.0).min(rect.height() / 2.0).max(0.0);
    cr.new_sub_path();
    cr.arc(rect.right - r, rect.top + r, r, -PI / 2.0, 0.0);
    cr.arc(rect.right - r, rect.bottom - r, r, 0.0, PI / 2.0);
    cr.arc(rect.left + r, rect.bottom - r, r, PI / 2.0, PI);
    cr.arc(rect.left + r, rect.top + r, r, PI, 3.0 * PI / 2.0);
    cr.close_path();
}

/// Converts straight RGBA into cairo's native-endian premultiplied ARGB.
fn image_surface(bitmap: &Bitmap) -> Result<ImageSurface, SurfaceError> {
    let width = bitmap.width();
    let stride = Format::ARgb32.stride_for_width(width)?;
    let mut data = vec![0u8; stride as usize * bitmap.height() as usize];

    for (y, row) in bitmap.pixels().chunks_exact(width as usize * 4).enumerate() {
        let out = &mut data[y * stride as usize..][..width as usize * 4];
        for (src, dst) in row.chunks_exact(4).zip(out.chunks_exact_mut(4)) {
            let a = src[3] as u32;
            let premultiply = |c: u8| (c as u32 * a + 127) / 255;
            let argb = a << 24 | premultiply(src[0]) << 16 | premultiply(src[1]) << 8 | premultiply(src[2]);
            dst.copy_from_slice(&argb.to_ne_bytes());
        }
    }

    Ok(ImageSurface::create_for_data(
        data,
        Format::ARgb32,
        width as i32,
        bitmap.height() as i32,
        stride,
    )?)
}

fn cached_image(bitmap: &Bitmap) -> Result<&ImageSurface, SurfaceError> {
    if let Some(image) = bitmap.image.0.get() {
        return Ok(image);
    }
    let image = image_surface(bitmap)?;
    Ok(bitmap.image.0.get_or_init(|| image))
}

impl Surface for Context {
    fn save(&mut self) -> Result<(), SurfaceError> {
        Ok(Context::save(self)?)
    }

    fn restore(&mut self) -> Result<(), SurfaceError> {
        Ok(Context::restore(self)?)
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        Context::translate(self, dx, dy);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        Context::scale(self, sx, sy);
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.new_path();
        self.rectangle(rect.left, rect.top, rect.width(), rect.height());
        self.clip();
    }

    fn clip_round_rect(&mut self, rect: Rect, radius: f64) {
        self.new_path();
        round_rect_path(self, rect, radius);
        self.clip();
    }

    fn clip_oval(&mut self, bounds: Rect) {
        oval_path(self, bounds);
        self.clip();
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), SurfaceError> {
        set_color(self, color);
        self.new_path();
        self.rectangle(rect.left, rect.top, rect.width(), rect.height());
        Ok(self.fill()?)
    }

    fn fill_round_rect(&mut self, rect: Rect, radius: f64, color: Color) -> Result<(), SurfaceError> {
        set_color(self, color);
        self.new_path();
        round_rect_path(self, rect, radius);
        Ok(self.fill()?)
    }

    fn fill_oval(&mut self, bounds: Rect, color: Color) -> Result<(), SurfaceError> {
        set_color(self, color);
        oval_path(self, bounds);
        Ok(self.fill()?)
    }

    fn stroke_oval(&mut self, bounds: Rect, width: f64, color: Color) -> Result<(), SurfaceError> {
        set_color(self, color);
        self.set_line_width(width);
        oval_path(self, bounds);
        Ok(self.stroke()?)
    }

    fn draw_bitmap(
        &mut self,
        bitmap: &Bitmap,
        src: Rect,
        dst: Rect,
        alpha: f64,
    ) -> Result<(), SurfaceError> {
        if src.width() <= 0.0 || src.height() <= 0.0 || dst.width() <= 0.0 || dst.height() <= 0.0 {
            return Ok(());
        }
        let image = cached_image(bitmap)?;

        Context::save(self)?;
        self.new_path();
        self.rectangle(dst.left, dst.top, dst.width(), dst.height());
        self.clip();
        Context::translate(self, dst.left, dst.top);
        Context::scale(self, dst.width() / src.width(), dst.height() / src.height());
        self.set_source_surface(image, -src.left, -src.top)?;
        let source = self.source();
        source.set_extend(Extend::Pad);
        source.set_filter(Filter::Bilinear);
        self.paint_with_alpha(alpha)?;
        Ok(Context::restore(self)?)
    }

    fn fill_text(&mut self, text: &str, center: Point, size: f64, color: Color) -> Result<(), SurfaceError> {
        set_color(self, color);
        self.select_font_face("Sans", FontSlant::Normal, FontWeight::Normal);
        self.set_font_size(size);
        let extents = self.text_extents(text)?;
        self.move_to(
            center.x - (extents.width() / 2.0 + extents.x_bearing()),
            center.y - (extents.height() / 2.0 + extents.y_bearing()),
        );
        Ok(self.show_text(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> Context {
        let surface = ImageSurface::create(Format::ARgb32, 8, 8).unwrap();
        Context::new(&surface).unwrap()
    }

    #[test]
    fn test_bitmap_is_converted_once() {
        let mut cr = target();
        let mut bitmap = Bitmap::new(2, 2);
        bitmap.set_pixel(0, 0, [0xFF, 0x00, 0x00, 0x80]);
        assert!(bitmap.image.0.get().is_none());

        let dst = Rect::new(0.0, 0.0, 8.0, 8.0);
        Surface::draw_bitmap(&mut cr, &bitmap, bitmap.bounds(), dst, 1.0).unwrap();
        let first = bitmap.image.0.get().unwrap().to_raw_none();
        for _ in 0..9 {
            Surface::draw_bitmap(&mut cr, &bitmap, bitmap.bounds(), dst, 0.5).unwrap();
        }
        assert_eq!(bitmap.image.0.get().unwrap().to_raw_none(), first);

        let copy = bitmap.clone();
        assert!(copy.image.0.get().is_none());
        assert_eq!(copy, bitmap);

        bitmap.set_pixel(1, 1, [0x00, 0xFF, 0x00, 0xFF]);
        assert!(bitmap.image.0.get().is_none());
    }

    #[test]
    fn test_pixels_are_premultiplied() {
        let mut bitmap = Bitmap::new(1, 1);
        bitmap.set_pixel(0, 0, [0xFF, 0x40, 0x00, 0x80]);
        let mut image = image_surface(&bitmap).unwrap();
        let data = image.data().unwrap();
        let argb = u32::from_ne_bytes([data[0], data[1], data[2], data[3]]);
        assert_eq!(argb, 0x8080_2000);
    }
}
