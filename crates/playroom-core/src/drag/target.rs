//! Drop targets

use std::fmt;
use std::rc::Rc;

use crate::math::{Rect, Vec2};

/// Supplies a target's current bounds; `None` once the target is detached
pub type BoundsFn = Rc<dyn Fn() -> Option<Rect>>;

/// Decides whether a target accepts an item
pub type AcceptFn<I, K> = Rc<dyn Fn(&I, &K) -> bool>;

/// A region an item can be dropped on.
///
/// Cloning shares the bounds and accept closures.
pub struct DropTarget<I, K> {
    key: K,
    bounds: BoundsFn,
    accept: AcceptFn<I, K>,
    single_use: bool,
    filled: bool,
}

impl<I, K> DropTarget<I, K> {
    /// Target whose bounds are looked up at resolution time
    pub fn new(
        key: K,
        bounds: impl Fn() -> Option<Rect> + 'static,
        accept: impl Fn(&I, &K) -> bool + 'static,
    ) -> Self {
        Self {
            key,
            bounds: Rc::new(bounds),
            accept: Rc::new(accept),
            single_use: false,
            filled: false,
        }
    }

    /// Target with fixed bounds
    pub fn fixed(key: K, rect: Rect, accept: impl Fn(&I, &K) -> bool + 'static) -> Self {
        Self::new(key, move || Some(rect), accept)
    }

    /// Accept one match only; once filled the target is ignored by hit-testing
    pub fn single_use(mut self) -> Self {
        self.single_use = true;
        self
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn bounds(&self) -> Option<Rect> {
        (self.bounds)()
    }

    /// Whether `point` lies inside the current bounds (edges included)
    pub fn contains(&self, point: Vec2) -> bool {
        self.bounds().is_some_and(|rect| rect.contains(point))
    }

    pub fn accepts(&self, item: &I) -> bool {
        (self.accept)(item, &self.key)
    }

    pub fn is_single_use(&self) -> bool {
        self.single_use
    }

    pub fn is_filled(&self) -> bool {
        self.filled
    }

    /// Record a match; only single-use targets become filled
    pub(crate) fn fill(&mut self) {
        if self.single_use {
            self.filled = true;
        }
    }
}

impl<I, K: Clone> Clone for DropTarget<I, K> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            bounds: Rc::clone(&self.bounds),
            accept: Rc::clone(&self.accept),
            single_use: self.single_use,
            filled: self.filled,
        }
    }
}

impl<I, K: fmt::Debug> fmt::Debug for DropTarget<I, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropTarget")
            .field("key", &self.key)
            .field("single_use", &self.single_use)
            .field("filled", &self.filled)
            .finish_non_exhaustive()
    }
}
