//! Complete pointer gestures against a [`MockHost`] and [`MockSurface`]

use playroom_core::{ElementId, Surface, Vec2};

use crate::{MockHost, MockSurface};

/// Pointer id used by the single-pointer helpers
pub const PRIMARY: i32 = 1;

/// Press the primary pointer on the center of `element`.
/// Returns the press position, or `None` if the element is detached.
pub fn press(host: &MockHost, surface: &MockSurface, element: ElementId) -> Option<Vec2> {
    let center = surface.bounds(element)?.center();
    host.pointer_down(PRIMARY, center, Some(element));
    Some(center)
}

/// Press `element`, move so its center lands on `to`, release there
pub fn drag_to(host: &MockHost, surface: &MockSurface, element: ElementId, to: Vec2) -> bool {
    if press(host, surface, element).is_none() {
        return false;
    }
    host.pointer_move(PRIMARY, to);
    host.pointer_up(PRIMARY, to);
    true
}

/// Press `element` and move it to `to` without releasing
pub fn lift_to(host: &MockHost, surface: &MockSurface, element: ElementId, to: Vec2) -> bool {
    if press(host, surface, element).is_none() {
        return false;
    }
    host.pointer_move(PRIMARY, to);
    true
}

/// Drag `element` onto the center of `target`
pub fn drop_on(host: &MockHost, surface: &MockSurface, element: ElementId, target: ElementId) -> bool {
    match surface.center(target) {
        Some(to) => drag_to(host, surface, element, to),
        None => false,
    }
}
