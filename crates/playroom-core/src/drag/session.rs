//! Live state of one drag gesture

use crate::host::{ElementId, PointerId};
use crate::math::{Rect, Size, Vec2};

/// One in-progress drag
#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
    /// Element being dragged
    pub element: ElementId,
    /// Pointer bound to this session; other pointers are ignored
    pub pointer: PointerId,
    /// Pointer position at pick-up
    pub start_pointer: Vec2,
    /// Element position (top-left) at pick-up
    pub origin: Vec2,
    /// Element size at pick-up
    pub size: Size,
    /// Current element position
    pub position: Vec2,
}

impl DragSession {
    pub fn new(element: ElementId, pointer: PointerId, start_pointer: Vec2, bounds: Rect) -> Self {
        Self {
            element,
            pointer,
            start_pointer,
            origin: bounds.position(),
            size: bounds.size(),
            position: bounds.position(),
        }
    }

    /// Move so the pointer keeps its offset from the element; returns the new position
    pub fn move_to(&mut self, pointer: Vec2) -> Vec2 {
        self.position = self.origin + (pointer - self.start_pointer);
        self.position
    }

    /// Center of the element at its current position
    pub fn center(&self) -> Vec2 {
        self.position + self.size.half()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_keeps_pointer_offset() {
        let mut session = DragSession::new(
            ElementId(1),
            PointerId(1),
            Vec2::new(30.0, 30.0),
            Rect::new(10.0, 20.0, 40.0, 40.0),
        );
        let pos = session.move_to(Vec2::new(130.0, 80.0));
        assert!(pos.approx_eq(Vec2::new(110.0, 70.0), 0.001));
        assert!(session.center().approx_eq(Vec2::new(130.0, 90.0), 0.001));
        assert!(session.origin.approx_eq(Vec2::new(10.0, 20.0), 0.001));
    }
}
