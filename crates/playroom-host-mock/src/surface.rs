//! In-memory surface

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};

use playroom_core::{ElementId, ElementSpec, PointerId, Rect, Size, Surface, Vec2};

/// Size given to elements appended without an explicit size
pub const DEFAULT_ELEMENT_SIZE: Size = Size::new(50.0, 50.0);

/// Surface keeping its elements in memory
///
/// Element positions are absolute surface coordinates regardless of nesting;
/// removing an element removes its descendants.
pub struct MockSurface {
    size: Cell<Size>,
    next_id: Cell<u64>,
    elements: RefCell<BTreeMap<ElementId, MockElement>>,
    captures: RefCell<BTreeMap<PointerId, ElementId>>,
    clear_count: Cell<usize>,
}

#[derive(Clone, Debug)]
struct MockElement {
    parent: Option<ElementId>,
    classes: BTreeSet<String>,
    text: String,
    color: Option<String>,
    rect: Rect,
}

impl MockSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Cell::new(Size::new(width, height)),
            next_id: Cell::new(1),
            elements: RefCell::new(BTreeMap::new()),
            captures: RefCell::new(BTreeMap::new()),
            clear_count: Cell::new(0),
        }
    }

    pub fn set_size(&self, size: Size) {
        self.size.set(size);
    }

    pub fn element_count(&self) -> usize {
        self.elements.borrow().len()
    }

    /// How many times the surface has been cleared
    pub fn clear_count(&self) -> usize {
        self.clear_count.get()
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.elements
            .borrow()
            .get(&id)
            .is_some_and(|e| e.classes.contains(class))
    }

    pub fn text(&self, id: ElementId) -> Option<String> {
        self.elements.borrow().get(&id).map(|e| e.text.clone())
    }

    pub fn color(&self, id: ElementId) -> Option<String> {
        self.elements.borrow().get(&id).and_then(|e| e.color.clone())
    }

    /// Top-left corner of an element
    pub fn position(&self, id: ElementId) -> Option<Vec2> {
        self.elements.borrow().get(&id).map(|e| e.rect.position())
    }

    pub fn center(&self, id: ElementId) -> Option<Vec2> {
        self.elements.borrow().get(&id).map(|e| e.rect.center())
    }

    /// Elements carrying `class`, in creation order
    pub fn find_by_class(&self, class: &str) -> Vec<ElementId> {
        self.elements
            .borrow()
            .iter()
            .filter(|(_, e)| e.classes.contains(class))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Elements whose text is exactly `text`
    pub fn find_by_text(&self, text: &str) -> Vec<ElementId> {
        self.elements
            .borrow()
            .iter()
            .filter(|(_, e)| e.text == text)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn children(&self, parent: ElementId) -> Vec<ElementId> {
        self.elements
            .borrow()
            .iter()
            .filter(|(_, e)| e.parent == Some(parent))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Topmost (most recently appended) element containing `point`
    pub fn hit_test(&self, point: Vec2) -> Option<ElementId> {
        self.elements
            .borrow()
            .iter()
            .rev()
            .find(|(_, e)| e.rect.contains(point))
            .map(|(id, _)| *id)
    }

    /// Element currently capturing `pointer`
    pub fn captured(&self, pointer: PointerId) -> Option<ElementId> {
        self.captures.borrow().get(&pointer).copied()
    }

    fn descendants(elements: &BTreeMap<ElementId, MockElement>, root: ElementId) -> Vec<ElementId> {
        let mut found = vec![root];
        let mut index = 0;
        while index < found.len() {
            let current = found[index];
            found.extend(
                elements
                    .iter()
                    .filter(|(_, e)| e.parent == Some(current))
                    .map(|(id, _)| *id),
            );
            index += 1;
        }
        found
    }
}

impl Surface for MockSurface {
    fn clear(&self) {
        self.elements.borrow_mut().clear();
        self.captures.borrow_mut().clear();
        self.clear_count.set(self.clear_count.get() + 1);
    }

    fn append(&self, parent: Option<ElementId>, spec: ElementSpec) -> ElementId {
        let id = ElementId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let element = MockElement {
            parent,
            classes: spec.class.split_whitespace().map(str::to_string).collect(),
            text: spec.text,
            color: spec.color,
            rect: Rect::from_pos_size(
                spec.position.unwrap_or(Vec2::ZERO),
                spec.size.unwrap_or(DEFAULT_ELEMENT_SIZE),
            ),
        };
        self.elements.borrow_mut().insert(id, element);
        id
    }

    fn remove(&self, id: ElementId) {
        let mut elements = self.elements.borrow_mut();
        if !elements.contains_key(&id) {
            return;
        }
        for removed in Self::descendants(&elements, id) {
            elements.remove(&removed);
            self.captures.borrow_mut().retain(|_, captured| *captured != removed);
        }
    }

    fn contains(&self, id: ElementId) -> bool {
        self.elements.borrow().contains_key(&id)
    }

    fn bounds(&self, id: ElementId) -> Option<Rect> {
        self.elements.borrow().get(&id).map(|e| e.rect)
    }

    fn size(&self) -> Size {
        self.size.get()
    }

    fn set_position(&self, id: ElementId, position: Vec2) {
        if let Some(element) = self.elements.borrow_mut().get_mut(&id) {
            element.rect.x = position.x;
            element.rect.y = position.y;
        }
    }

    fn set_text(&self, id: ElementId, text: &str) {
        if let Some(element) = self.elements.borrow_mut().get_mut(&id) {
            element.text = text.to_string();
        }
    }

    fn set_class(&self, id: ElementId, class: &str, enabled: bool) {
        if let Some(element) = self.elements.borrow_mut().get_mut(&id) {
            if enabled {
                element.classes.insert(class.to_string());
            } else {
                element.classes.remove(class);
            }
        }
    }

    fn capture_pointer(&self, id: ElementId, pointer: PointerId) {
        if self.contains(id) {
            self.captures.borrow_mut().insert(pointer, id);
        }
    }

    fn release_pointer(&self, id: ElementId, pointer: PointerId) {
        let mut captures = self.captures.borrow_mut();
        if captures.get(&pointer) == Some(&id) {
            captures.remove(&pointer);
        }
    }
}
