//! Surface contract
//!
//! A surface is the opaque container an activity renders into. The activity
//! has exclusive write access to its contents between `mount` and `unmount`.
//! Methods take `&self`: implementations use interior mutability so that
//! callbacks holding an `Rc<dyn Surface>` can update it.

use serde::{Deserialize, Serialize};

use super::PointerId;
use crate::math::{Rect, Size, Vec2};

/// Identifier of an element appended to a surface
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u64);

/// Description of an element to append
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementSpec {
    /// Space-separated class list
    pub class: String,
    /// Text content
    pub text: String,
    /// Absolute position (top-left) in surface coordinates; `None` lets the
    /// surface lay the element out
    pub position: Option<Vec2>,
    /// Explicit size; `None` lets the surface size the element
    pub size: Option<Size>,
    /// Background color (CSS color string)
    pub color: Option<String>,
}

impl ElementSpec {
    /// Element with the given class list
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            ..Self::default()
        }
    }

    /// Set text content
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Place the element at an absolute position
    pub fn at(mut self, position: Vec2) -> Self {
        self.position = Some(position);
        self
    }

    /// Give the element an explicit size
    pub fn sized(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    /// Set background color
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Drawing and interaction area handed to a mounted activity
pub trait Surface {
    /// Remove every element
    fn clear(&self);

    /// Append an element under `parent` (or the root) and return its id
    fn append(&self, parent: Option<ElementId>, spec: ElementSpec) -> ElementId;

    /// Remove an element and its children; unknown ids are ignored
    fn remove(&self, id: ElementId);

    /// Whether `id` is currently attached to this surface
    fn contains(&self, id: ElementId) -> bool;

    /// Current bounding box in surface coordinates; `None` once detached
    fn bounds(&self, id: ElementId) -> Option<Rect>;

    /// Size of the surface itself
    fn size(&self) -> Size;

    /// Move an element's top-left corner
    fn set_position(&self, id: ElementId, position: Vec2);

    /// Replace an element's text content
    fn set_text(&self, id: ElementId, text: &str);

    /// Add or remove one class
    fn set_class(&self, id: ElementId, class: &str, enabled: bool);

    /// Route all further events of `pointer` to `id` until released
    fn capture_pointer(&self, id: ElementId, pointer: PointerId);

    /// Undo [`Surface::capture_pointer`]; ignored when not captured
    fn release_pointer(&self, id: ElementId, pointer: PointerId);
}
