//! Input events delivered by the host

use serde::{Deserialize, Serialize};

use super::ElementId;
use crate::math::{Size, Vec2};

/// Identifier of one pointer (mouse, pen or a single touch contact)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PointerId(pub i32);

/// Where a listener is attached
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// The surface root; receives events whose target is inside the surface
    Surface,
    /// One element of the surface
    Element(ElementId),
    /// The whole document; receives every pointer event, including those of a
    /// captured pointer that has left its element
    Document,
    /// The window; receives resize events
    Window,
}

/// Kind of event a listener subscribes to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerDown,
    PointerMove,
    PointerUp,
    PointerCancel,
    Resize,
}

impl EventKind {
    /// DOM event type name
    pub fn dom_name(self) -> &'static str {
        match self {
            EventKind::PointerDown => "pointerdown",
            EventKind::PointerMove => "pointermove",
            EventKind::PointerUp => "pointerup",
            EventKind::PointerCancel => "pointercancel",
            EventKind::Resize => "resize",
        }
    }

    /// Whether this kind carries a [`PointerEvent`]
    pub fn is_pointer(self) -> bool {
        !matches!(self, EventKind::Resize)
    }
}

/// Listener registration options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListenOptions {
    /// Handler never cancels the default action
    pub passive: bool,
    /// Listener is removed after its first delivery
    pub once: bool,
}

impl ListenOptions {
    /// Options for a listener that detaches after one delivery
    pub fn once() -> Self {
        Self {
            once: true,
            ..Self::default()
        }
    }
}

/// Pointer event payload
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Pointer that produced the event
    pub pointer_id: PointerId,
    /// Position in surface coordinates
    pub position: Vec2,
    /// Element under the pointer, if it belongs to the surface
    pub target: Option<ElementId>,
}

impl PointerEvent {
    /// Create a pointer event
    pub fn new(pointer_id: PointerId, position: Vec2, target: Option<ElementId>) -> Self {
        Self {
            pointer_id,
            position,
            target,
        }
    }
}

/// Event delivered to a listener
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// Pointer down/move/up/cancel
    Pointer(PointerEvent),
    /// Viewport resized
    Resize(Size),
}

impl InputEvent {
    /// Pointer payload, if this is a pointer event
    pub fn as_pointer(&self) -> Option<&PointerEvent> {
        match self {
            InputEvent::Pointer(p) => Some(p),
            InputEvent::Resize(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_dom_names() {
        assert_eq!(EventKind::PointerDown.dom_name(), "pointerdown");
        assert_eq!(EventKind::PointerCancel.dom_name(), "pointercancel");
        assert!(EventKind::PointerMove.is_pointer());
        assert!(!EventKind::Resize.is_pointer());
    }

    #[test]
    fn test_input_event_as_pointer() {
        let event = InputEvent::Pointer(PointerEvent::new(PointerId(3), Vec2::new(1.0, 2.0), None));
        assert_eq!(event.as_pointer().map(|p| p.pointer_id), Some(PointerId(3)));
        assert!(InputEvent::Resize(Size::new(10.0, 10.0)).as_pointer().is_none());
    }

    #[test]
    fn test_pointer_ids_key_ordered_maps() {
        let mut captures = std::collections::BTreeMap::new();
        captures.insert(PointerId(7), ElementId(1));
        captures.insert(PointerId(2), ElementId(2));
        assert_eq!(captures.keys().copied().collect::<Vec<_>>(), vec![PointerId(2), PointerId(7)]);
    }
}
