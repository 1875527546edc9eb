//! Celebration effects

/// Particle burst at a point of the surface
pub trait Celebration {
    fn burst(&self, x: f32, y: f32, count: u32);
}

/// Does nothing
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopCelebration;

impl Celebration for NoopCelebration {
    fn burst(&self, _x: f32, _y: f32, _count: u32) {}
}
