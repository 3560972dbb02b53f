//! Integer screen-space geometry shared by the overlay components.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointI {
    pub x: i32,
    pub y: i32,
}

impl PointI {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Sub-pixel point used for in-progress selections and drawing commands.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

impl PointF {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<PointI> for PointF {
    fn from(point: PointI) -> Self {
        Self {
            x: point.x as f32,
            y: point.y as f32,
        }
    }
}

/// Half-open screen rectangle: `left..right` by `top..bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectI {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl RectI {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn from_xywh(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            left: x,
            top: y,
            right: x + width,
            bottom: y + height,
        }
    }

    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    pub fn contains(&self, point: PointI) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::{PointI, RectI};

    #[test]
    fn containment_is_half_open() {
        let rect = RectI::from_xywh(0, 0, 1920, 1080);
        assert!(rect.contains(PointI::new(0, 0)));
        assert!(rect.contains(PointI::new(1919, 1079)));
        assert!(!rect.contains(PointI::new(1920, 10)));
        assert!(!rect.contains(PointI::new(10, 1080)));
        assert!(!rect.contains(PointI::new(-1, 0)));
    }

    #[test]
    fn empty_rect_contains_nothing() {
        let rect = RectI::default();
        assert!(rect.is_empty());
        assert!(!rect.contains(PointI::new(0, 0)));
    }

    #[test]
    fn negative_origin_monitors_resolve_width_and_containment() {
        let rect = RectI::from_xywh(-1920, 0, 1920, 1080);
        assert_eq!(rect.width(), 1920);
        assert!(rect.contains(PointI::new(-10, 100)));
        assert!(!rect.contains(PointI::new(0, 100)));
    }
}
