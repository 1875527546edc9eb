//! DOM-backed surface
//!
//! Every element is an absolutely positioned `div` under the root, tagged
//! with `data-element-id` so input events can be mapped back to an
//! [`ElementId`]. Positions are relative to the root's bounding box.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use playroom_core::{ElementId, ElementSpec, PointerId, Rect, Size, Surface, Vec2};
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Node};

/// Attribute carrying the element id
pub const ELEMENT_ID_ATTR: &str = "data-element-id";

/// Surface rendering into a root `HtmlElement`
pub struct DomSurface {
    document: Document,
    root: HtmlElement,
    next_id: Cell<u64>,
    elements: RefCell<HashMap<ElementId, HtmlElement>>,
}

impl DomSurface {
    pub fn new(document: Document, root: HtmlElement) -> Self {
        Self {
            document,
            root,
            next_id: Cell::new(1),
            elements: RefCell::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &HtmlElement {
        &self.root
    }

    pub fn element(&self, id: ElementId) -> Option<HtmlElement> {
        self.elements.borrow().get(&id).cloned()
    }

    /// Element id of the nearest tagged ancestor of `node`, if it belongs to this surface
    pub fn element_id_of(&self, node: &Element) -> Option<ElementId> {
        let tagged = node.closest(&format!("[{ELEMENT_ID_ATTR}]")).ok().flatten()?;
        let id = ElementId(tagged.get_attribute(ELEMENT_ID_ATTR)?.parse().ok()?);
        self.elements.borrow().contains_key(&id).then_some(id)
    }

    /// Convert viewport coordinates to surface coordinates
    pub fn to_local(&self, client_x: f64, client_y: f64) -> Vec2 {
        let origin = self.root.get_bounding_client_rect();
        Vec2::new((client_x - origin.x()) as f32, (client_y - origin.y()) as f32)
    }

    /// Top-left of `container` in surface coordinates; zero for the root
    fn origin_of(&self, container: &Element) -> Vec2 {
        let root: &Element = &self.root;
        if container == root {
            return Vec2::ZERO;
        }
        let rect = container.get_bounding_client_rect();
        self.to_local(rect.x(), rect.y())
    }

    fn create(&self, spec: &ElementSpec, id: ElementId, offset: Vec2) -> Option<HtmlElement> {
        let element = self
            .document
            .create_element("div")
            .ok()?
            .dyn_into::<HtmlElement>()
            .ok()?;
        element.set_class_name(&spec.class);
        if !spec.text.is_empty() {
            element.set_text_content(Some(&spec.text));
        }
        element.set_attribute(ELEMENT_ID_ATTR, &id.0.to_string()).ok()?;

        let style = element.style();
        if let Some(position) = spec.position {
            let position = position - offset;
            style.set_property("position", "absolute").ok()?;
            style.set_property("left", &px(position.x)).ok()?;
            style.set_property("top", &px(position.y)).ok()?;
        }
        if let Some(size) = spec.size {
            style.set_property("width", &px(size.width)).ok()?;
            style.set_property("height", &px(size.height)).ok()?;
        }
        if let Some(color) = &spec.color {
            style.set_property("background-color", color).ok()?;
        }
        Some(element)
    }
}

fn px(value: f32) -> String {
    format!("{value}px")
}

impl Surface for DomSurface {
    fn clear(&self) {
        self.root.set_inner_html("");
        self.elements.borrow_mut().clear();
    }

    fn append(&self, parent: Option<ElementId>, spec: ElementSpec) -> ElementId {
        let id = ElementId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let host: HtmlElement = parent
            .and_then(|p| self.element(p))
            .unwrap_or_else(|| self.root.clone());
        let Some(element) = self.create(&spec, id, self.origin_of(&host)) else {
            warn!(?id, class = %spec.class, "failed to create element");
            return id;
        };
        if host.append_child(&element).is_err() {
            warn!(?id, "failed to attach element");
            return id;
        }
        self.elements.borrow_mut().insert(id, element);
        id
    }

    fn remove(&self, id: ElementId) {
        let Some(element) = self.elements.borrow_mut().remove(&id) else {
            return;
        };
        element.remove();
        // Descendants went with it
        let root = &self.root;
        self.elements.borrow_mut().retain(|_, e| {
            let node: &Node = e;
            root.contains(Some(node))
        });
    }

    fn contains(&self, id: ElementId) -> bool {
        self.elements.borrow().contains_key(&id)
    }

    fn bounds(&self, id: ElementId) -> Option<Rect> {
        let element = self.element(id)?;
        let rect = element.get_bounding_client_rect();
        let origin = self.to_local(rect.x(), rect.y());
        Some(Rect::new(
            origin.x,
            origin.y,
            rect.width() as f32,
            rect.height() as f32,
        ))
    }

    fn size(&self) -> Size {
        let rect = self.root.get_bounding_client_rect();
        Size::new(rect.width() as f32, rect.height() as f32)
    }

    fn set_position(&self, id: ElementId, position: Vec2) {
        let Some(element) = self.element(id) else {
            return;
        };
        let offset = element
            .parent_element()
            .map_or(Vec2::ZERO, |parent| self.origin_of(&parent));
        let position = position - offset;
        let style = element.style();
        let result = style
            .set_property("position", "absolute")
            .and_then(|_| style.set_property("left", &px(position.x)))
            .and_then(|_| style.set_property("top", &px(position.y)));
        if result.is_err() {
            debug!(?id, "failed to move element");
        }
    }

    fn set_text(&self, id: ElementId, text: &str) {
        if let Some(element) = self.element(id) {
            element.set_text_content(Some(text));
        }
    }

    fn set_class(&self, id: ElementId, class: &str, enabled: bool) {
        if let Some(element) = self.element(id) {
            let _ = element.class_list().toggle_with_force(class, enabled);
        }
    }

    fn capture_pointer(&self, id: ElementId, pointer: PointerId) {
        if let Some(element) = self.element(id) {
            if element.set_pointer_capture(pointer.0).is_err() {
                debug!(?id, pointer = pointer.0, "pointer capture refused");
            }
        }
    }

    fn release_pointer(&self, id: ElementId, pointer: PointerId) {
        if let Some(element) = self.element(id) {
            let _ = element.release_pointer_capture(pointer.0);
        }
    }
}
