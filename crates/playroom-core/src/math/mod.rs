//! Core geometry types for surfaces, elements and pointer positions
//!
//! All coordinates are surface-local: the origin is the top-left corner of
//! the surface an activity is mounted into.

mod vec2;
mod rect;
mod size;

pub use vec2::Vec2;
pub use rect::Rect;
pub use size::Size;
