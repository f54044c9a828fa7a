//! Plane geometry used to place the menu panel and drive the reveal.

use crate::anchor::{AxisAnchor, MenuAnchor};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Axis-aligned rectangle stored as its four edges.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(
            origin.x,
            origin.y,
            origin.x + size.width,
            origin.y + size.height,
        )
    }

    /// Square of side `2 * radius` centered on `center`.
    pub fn around(center: Point, radius: f64) -> Self {
        Self::new(
            center.x - radius,
            center.y - radius,
            center.x + radius,
            center.y + radius,
        )
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Edges are inclusive, so a point on the shared edge of two adjacent
    /// cells hits both and the first one wins.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.left + dx, self.top + dy, self.right + dx, self.bottom + dy)
    }

    /// Shrinks each edge inward; negative values grow the rect.
    pub fn inset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.left + dx, self.top + dy, self.right - dx, self.bottom - dy)
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left, self.top),
            Point::new(self.right, self.top),
            Point::new(self.right, self.bottom),
            Point::new(self.left, self.bottom),
        ]
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }
}

pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + t * (to - from)
}

/// Places one axis of the panel. `near`/`far` are the button's edges on that
/// axis and `extent` the panel's length along it.
pub fn axis_origin(near: f64, far: f64, extent: f64, anchor: AxisAnchor, margin: f64) -> f64 {
    let (min, max) = if anchor.outside() {
        (near - extent - margin, far + margin)
    } else {
        (near, far - extent)
    };
    lerp(min, max, anchor.position())
}

/// Top-left corner of a panel of `menu_size` anchored to the circular button
/// at `button_center`. Each axis is placed independently.
pub fn menu_origin(
    button_center: Point,
    button_radius: f64,
    menu_size: Size,
    anchor: MenuAnchor,
    margin: f64,
) -> Point {
    Point::new(
        axis_origin(
            button_center.x - button_radius,
            button_center.x + button_radius,
            menu_size.width,
            anchor.horizontal,
            margin,
        ),
        axis_origin(
            button_center.y - button_radius,
            button_center.y + button_radius,
            menu_size.height,
            anchor.vertical,
            margin,
        ),
    )
}

/// Translates `rect` so its edges fall within `[margin, screen - margin]`.
///
/// The rect is never resized. When it is larger than the usable area the far
/// edge wins and the near edge is left overflowing.
pub fn clamp_to_usable_screen(rect: Rect, screen: Size, margin: f64) -> Rect {
    let mut rect = rect;
    let right = screen.width - margin;
    let bottom = screen.height - margin;

    if rect.left < margin {
        rect = rect.offset(margin - rect.left, 0.0);
    }
    if rect.top < margin {
        rect = rect.offset(0.0, margin - rect.top);
    }
    if rect.right > right {
        rect = rect.offset(right - rect.right, 0.0);
    }
    if rect.bottom > bottom {
        rect = rect.offset(0.0, bottom - rect.bottom);
    }
    rect
}

/// Radius of the smallest disc centered on `center` that covers `rect`.
pub fn covering_radius(rect: Rect, center: Point) -> f64 {
    rect.corners()
        .into_iter()
        .map(|corner| corner.distance(center))
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const EPSILON: f64 = 1e-9;

    fn random_rect(rng: &mut StdRng) -> Rect {
        let left = rng.random_range(-500.0..500.0);
        let top = rng.random_range(-500.0..500.0);
        Rect::new(
            left,
            top,
            left + rng.random_range(0.0..400.0),
            top + rng.random_range(0.0..400.0),
        )
    }

    #[test]
    fn test_covering_radius_reaches_farthest_corner() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..1000 {
            let rect = random_rect(&mut rng);
            let center = Point::new(rng.random_range(-800.0..800.0), rng.random_range(-800.0..800.0));
            let radius = covering_radius(rect, center);

            let distances = rect.corners().map(|c| c.distance(center));
            assert!(distances.iter().all(|&d| d <= radius + EPSILON));
            assert!(distances.iter().any(|&d| (d - radius).abs() < EPSILON));
        }
    }

    #[test]
    fn test_covering_radius_for_centered_square() {
        let rect = Rect::new(-3.0, -4.0, 3.0, 4.0);
        assert!((covering_radius(rect, Point::default()) - 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_inside_anchor_overlaps_button() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let near = rng.random_range(-100.0..100.0);
            let far = near + rng.random_range(1.0..80.0);
            let extent = rng.random_range(0.0..300.0);
            let anchor = AxisAnchor::new(rng.random_range(0.0..=1.0), false);
            let margin = rng.random_range(0.0..32.0);

            let start = axis_origin(near, far, extent, anchor, margin);
            let end = start + extent;
            assert!(start <= far + EPSILON && end >= near - EPSILON);
        }
    }

    #[test]
    fn test_outside_anchor_never_overlaps_button() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let near = rng.random_range(-100.0..100.0);
            let far = near + rng.random_range(1.0..80.0);
            let extent = rng.random_range(0.0..300.0);
            let margin = rng.random_range(0.0..32.0);

            for position in [0.0, 1.0] {
                let anchor = AxisAnchor::new(position, true);
                let start = axis_origin(near, far, extent, anchor, margin);
                let end = start + extent;
                assert!(end <= near - margin + EPSILON || start >= far + margin - EPSILON);
            }
        }
    }

    #[test]
    fn test_menu_origin_right_of_button() {
        let anchor: MenuAnchor = "right".parse().unwrap();
        let origin = menu_origin(Point::new(100.0, 100.0), 28.0, Size::new(176.0, 64.0), anchor, 16.0);
        assert_eq!(origin, Point::new(128.0 + 16.0, 100.0 - 32.0));
    }

    #[test]
    fn test_clamp_translates_into_usable_area() {
        let screen = Size::new(400.0, 300.0);
        let rect = Rect::new(-20.0, 250.0, 80.0, 330.0);
        let clamped = clamp_to_usable_screen(rect, screen, 10.0);
        assert_eq!(clamped, Rect::new(10.0, 210.0, 110.0, 290.0));
        assert_eq!(clamped.size(), rect.size());
    }

    #[test]
    fn test_clamp_oversized_rect_only_translates() {
        let screen = Size::new(100.0, 100.0);
        let rect = Rect::new(0.0, 0.0, 150.0, 50.0);
        let clamped = clamp_to_usable_screen(rect, screen, 10.0);
        assert_eq!(clamped.size(), rect.size());
        assert_eq!(clamped.right, 90.0);
        assert!(clamped.left < 10.0);
    }

    #[test]
    fn test_clamp_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let rect = random_rect(&mut rng);
            let screen = Size::new(rng.random_range(50.0..1200.0), rng.random_range(50.0..1200.0));
            let margin = rng.random_range(0.0..24.0);

            let once = clamp_to_usable_screen(rect, screen, margin);
            let twice = clamp_to_usable_screen(once, screen, margin);
            for (a, b) in once.corners().into_iter().zip(twice.corners()) {
                assert!(a.distance(b) < 1e-6, "{once:?} != {twice:?}");
            }
        }
    }
}
