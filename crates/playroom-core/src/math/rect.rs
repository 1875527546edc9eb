//! Axis-aligned rectangle type

use serde::{Deserialize, Serialize};
use super::{Size, Vec2};

/// Axis-aligned rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Create from left/top/right/bottom edges
    #[inline]
    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    /// Create from position and size
    #[inline]
    pub fn from_pos_size(pos: Vec2, size: Size) -> Self {
        Self::new(pos.x, pos.y, size.width, size.height)
    }

    /// Get the center point
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Get position (top-left corner)
    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Get size
    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Get the right edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Get the bottom edge
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Check if a point is inside the rectangle.
    ///
    /// Edges are inclusive on all four sides: a drop exactly on a target's
    /// border counts as landing on it.
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_inclusive_edges() {
        let rect = Rect::from_edges(0.0, 0.0, 100.0, 100.0);
        assert!(rect.contains(Vec2::new(50.0, 50.0)));
        assert!(rect.contains(Vec2::new(0.0, 0.0)));
        assert!(rect.contains(Vec2::new(100.0, 100.0)));
        assert!(!rect.contains(Vec2::new(100.1, 50.0)));
        assert!(!rect.contains(Vec2::new(-0.1, 50.0)));
    }

    #[test]
    fn test_rect_center() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        let center = rect.center();
        assert!((center.x - 60.0).abs() < 0.001);
        assert!((center.y - 45.0).abs() < 0.001);
    }

    #[test]
    fn test_rect_from_edges() {
        let rect = Rect::from_edges(50.0, 50.0, 150.0, 150.0);
        assert!((rect.width - 100.0).abs() < 0.001);
        assert!((rect.height - 100.0).abs() < 0.001);
        assert!((rect.right() - 150.0).abs() < 0.001);
        assert!((rect.bottom() - 150.0).abs() < 0.001);
    }

    #[test]
    fn test_rect_from_pos_size() {
        let rect = Rect::from_pos_size(Vec2::new(5.0, 6.0), Size::new(7.0, 8.0));
        assert_eq!(rect.position(), Vec2::new(5.0, 6.0));
        assert_eq!(rect.size(), Size::new(7.0, 8.0));
    }
}
