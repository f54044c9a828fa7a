//! A [`Surface`] that records calls instead of rasterising them.

use super::{Bitmap, Surface, SurfaceError};
use crate::color::Color;
use crate::geometry::{Point, Rect};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Save,
    Restore,
    Translate { dx: f64, dy: f64 },
    Scale { sx: f64, sy: f64 },
    ClipRect { rect: Rect },
    ClipRoundRect { rect: Rect, radius: f64 },
    ClipOval { bounds: Rect },
    FillRect { rect: Rect, color: Color },
    FillRoundRect { rect: Rect, radius: f64, color: Color },
    FillOval { bounds: Rect, color: Color },
    StrokeOval { bounds: Rect, width: f64, color: Color },
    Bitmap { size: (u32, u32), src: Rect, dst: Rect, alpha: f64 },
    Text { text: String, center: Point, size: f64, color: Color },
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
    depth: usize,
}

impl RecordingSurface {
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Number of saves not yet restored.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn clear(&mut self) {
        self.ops.clear();
        self.depth = 0;
    }

    fn push(&mut self, op: DrawOp) -> Result<(), SurfaceError> {
        self.ops.push(op);
        Ok(())
    }
}

impl Surface for RecordingSurface {
    fn save(&mut self) -> Result<(), SurfaceError> {
        self.depth += 1;
        self.push(DrawOp::Save)
    }

    fn restore(&mut self) -> Result<(), SurfaceError> {
        self.depth = self
            .depth
            .checked_sub(1)
            .ok_or(SurfaceError::UnbalancedRestore)?;
        self.push(DrawOp::Restore)
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.ops.push(DrawOp::Translate { dx, dy });
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.ops.push(DrawOp::Scale { sx, sy });
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.ops.push(DrawOp::ClipRect { rect });
    }

    fn clip_round_rect(&mut self, rect: Rect, radius: f64) {
        self.ops.push(DrawOp::ClipRoundRect { rect, radius });
    }

    fn clip_oval(&mut self, bounds: Rect) {
        self.ops.push(DrawOp::ClipOval { bounds });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), SurfaceError> {
        self.push(DrawOp::FillRect { rect, color })
    }

    fn fill_round_rect(&mut self, rect: Rect, radius: f64, color: Color) -> Result<(), SurfaceError> {
        self.push(DrawOp::FillRoundRect {
            rect,
            radius,
            color,
        })
    }

    fn fill_oval(&mut self, bounds: Rect, color: Color) -> Result<(), SurfaceError> {
        self.push(DrawOp::FillOval { bounds, color })
    }

    fn stroke_oval(&mut self, bounds: Rect, width: f64, color: Color) -> Result<(), SurfaceError> {
        self.push(DrawOp::StrokeOval {
            bounds,
            width,
            color,
        })
    }

    fn draw_bitmap(
        &mut self,
        bitmap: &Bitmap,
        src: Rect,
        dst: Rect,
        alpha: f64,
    ) -> Result<(), SurfaceError> {
        self.push(DrawOp::Bitmap {
            size: (bitmap.width(), bitmap.height()),
            src,
            dst,
            alpha,
        })
    }

    fn fill_text(&mut self, text: &str, center: Point, size: f64, color: Color) -> Result<(), SurfaceError> {
        self.push(DrawOp::Text {
            text: text.to_string(),
            center,
            size,
            color,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::with_saved_state;

    #[test]
    fn test_restore_without_save_fails() {
        let mut surface = RecordingSurface::default();
        surface.save().unwrap();
        surface.restore().unwrap();
        assert!(matches!(
            surface.restore(),
            Err(SurfaceError::UnbalancedRestore)
        ));
        assert_eq!(surface.ops(), &[DrawOp::Save, DrawOp::Restore]);
    }

    #[test]
    fn test_saved_state_restores_after_failure() {
        let mut surface = RecordingSurface::default();
        let result = with_saved_state(&mut surface, |s| {
            s.translate(1.0, 2.0);
            Err(SurfaceError::Backend("out of memory".into()))
        });
        assert!(matches!(result, Err(SurfaceError::Backend(_))));
        assert_eq!(surface.depth(), 0);
        assert_eq!(surface.ops().last(), Some(&DrawOp::Restore));
    }

    #[test]
    fn test_scale_about_brackets_with_translations() {
        let mut surface = RecordingSurface::default();
        surface.scale_about(Point::new(10.0, 20.0), 0.5);
        assert_eq!(
            surface.ops(),
            &[
                DrawOp::Translate { dx: 10.0, dy: 20.0 },
                DrawOp::Scale { sx: 0.5, sy: 0.5 },
                DrawOp::Translate { dx: -10.0, dy: -20.0 },
            ]
        );
    }
}
