//! Host wiring for the drag state machine

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use super::{DragReport, DragSession, DragTracker, DropTarget, PendingDrop};
use crate::activity::Stage;
use crate::config::DragConfig;
use crate::host::{ElementId, EventKind, EventTarget, InputEvent, ListenOptions, PointerEvent};
use crate::math::Vec2;
use crate::scope::Handle;

type ResolveFn<I, K> = Box<dyn FnMut(&DragReport<I, K>)>;
type PickUpFn<I> = Box<dyn FnMut(ElementId, &I)>;

/// Drag-and-drop gesture recognizer bound to one mount generation.
///
/// Every listener and delayed return goes through the stage's scope, so
/// unmounting the activity tears the controller down with it. Listener
/// closures hold the controller weakly; the activity keeps it alive by
/// storing it.
pub struct DragController<I, K> {
    inner: Rc<ControllerInner<I, K>>,
}

struct ControllerInner<I, K> {
    stage: Stage,
    config: DragConfig,
    tracker: RefCell<DragTracker<I, K>>,
    on_resolve: RefCell<Option<ResolveFn<I, K>>>,
    on_pick_up: RefCell<Option<PickUpFn<I>>>,
    pick_up_listeners: RefCell<HashMap<ElementId, Handle>>,
}

impl<I, K> Clone for DragController<I, K> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<I: Clone + 'static, K: Clone + 'static> DragController<I, K> {
    /// Create a controller and attach its document-level move/up/cancel listeners
    pub fn attach(stage: &Stage, config: DragConfig) -> Self {
        let inner = Rc::new(ControllerInner {
            stage: stage.clone(),
            tracker: RefCell::new(DragTracker::new(config.lifted_class.clone())),
            config,
            on_resolve: RefCell::new(None),
            on_pick_up: RefCell::new(None),
            pick_up_listeners: RefCell::new(HashMap::new()),
        });

        for kind in [EventKind::PointerMove, EventKind::PointerUp, EventKind::PointerCancel] {
            let weak = Rc::downgrade(&inner);
            stage.scope().listen(
                EventTarget::Document,
                kind,
                ListenOptions::default(),
                move |event| {
                    let Some(inner) = weak.upgrade() else {
                        return;
                    };
                    let Some(pointer) = event.as_pointer() else {
                        return;
                    };
                    match kind {
                        EventKind::PointerMove => inner.on_move(pointer),
                        EventKind::PointerUp => ControllerInner::on_release(&inner, pointer),
                        _ => ControllerInner::on_cancel(&inner, pointer),
                    }
                },
            );
        }

        Self { inner }
    }

    /// Set the callback receiving one report per resolved drag
    pub fn on_resolve(&self, callback: impl FnMut(&DragReport<I, K>) + 'static) {
        *self.inner.on_resolve.borrow_mut() = Some(Box::new(callback));
    }

    /// Set the callback run when a draggable is lifted
    pub fn on_pick_up(&self, callback: impl FnMut(ElementId, &I) + 'static) {
        *self.inner.on_pick_up.borrow_mut() = Some(Box::new(callback));
    }

    /// Make `element` draggable. Registering it again replaces its item.
    pub fn add_draggable(&self, element: ElementId, item: I) {
        self.inner.tracker.borrow_mut().add_draggable(element, item);

        let weak: Weak<ControllerInner<I, K>> = Rc::downgrade(&self.inner);
        let handle = self.inner.stage.scope().listen(
            EventTarget::Element(element),
            EventKind::PointerDown,
            ListenOptions::default(),
            move |event: &InputEvent| {
                if let (Some(inner), Some(pointer)) = (weak.upgrade(), event.as_pointer()) {
                    inner.on_pick_up(element, pointer);
                }
            },
        );
        let previous = self.inner.pick_up_listeners.borrow_mut().insert(element, handle);
        if let Some(previous) = previous {
            self.inner.stage.scope().cancel(previous);
        }
    }

    /// Stop tracking `element`; a live drag of it is discarded
    pub fn remove_draggable(&self, element: ElementId) {
        self.inner.tracker.borrow_mut().remove_draggable(element);
        let handle = self.inner.pick_up_listeners.borrow_mut().remove(&element);
        if let Some(handle) = handle {
            self.inner.stage.scope().cancel(handle);
        }
    }

    /// Append a target; returns its index
    pub fn add_target(&self, target: DropTarget<I, K>) -> usize {
        self.inner.tracker.borrow_mut().add_target(target)
    }

    /// Append a target tracking the live bounds of a surface element
    pub fn add_target_element(
        &self,
        key: K,
        element: ElementId,
        accept: impl Fn(&I, &K) -> bool + 'static,
    ) -> usize {
        let surface = Rc::clone(self.inner.stage.surface());
        self.add_target(DropTarget::new(key, move || surface.bounds(element), accept))
    }

    /// Same as [`DragController::add_target_element`] for a single-use target
    pub fn add_single_use_target_element(
        &self,
        key: K,
        element: ElementId,
        accept: impl Fn(&I, &K) -> bool + 'static,
    ) -> usize {
        let surface = Rc::clone(self.inner.stage.surface());
        self.add_target(DropTarget::new(key, move || surface.bounds(element), accept).single_use())
    }

    pub fn is_dragging(&self) -> bool {
        self.inner.tracker.borrow().is_dragging()
    }

    pub fn session(&self) -> Option<DragSession> {
        self.inner.tracker.borrow().session().cloned()
    }

    pub fn is_draggable(&self, element: ElementId) -> bool {
        self.inner.tracker.borrow().is_draggable(element)
    }

    pub fn is_target_filled(&self, index: usize) -> bool {
        self.inner
            .tracker
            .borrow()
            .targets()
            .get(index)
            .is_some_and(DropTarget::is_filled)
    }

    /// Whether every single-use target has been matched
    pub fn all_targets_filled(&self) -> bool {
        self.inner.tracker.borrow().all_single_use_filled()
    }

    /// Cancel the live session, resolving it as a miss. Returns false when idle.
    pub fn cancel(&self) -> bool {
        let pending = self.inner.tracker.borrow_mut().begin_cancel(None);
        match ControllerInner::settle(&self.inner, pending) {
            Some(report) => {
                ControllerInner::dispatch(&self.inner, report);
                true
            }
            None => false,
        }
    }

    /// Forget every draggable and target and discard the live session.
    /// Document listeners stay attached.
    pub fn reset(&self) {
        let discarded = self.inner.tracker.borrow_mut().clear();
        if let Some(session) = discarded {
            let surface = self.inner.stage.surface();
            surface.release_pointer(session.element, session.pointer);
            if surface.contains(session.element) {
                surface.set_class(session.element, &self.inner.config.lifted_class, false);
            }
        }
        let handles: Vec<Handle> = self
            .inner
            .pick_up_listeners
            .borrow_mut()
            .drain()
            .map(|(_, handle)| handle)
            .collect();
        for handle in handles {
            self.inner.stage.scope().cancel(handle);
        }
        debug!(scope = %self.inner.stage.scope().label(), "drag controller reset");
    }
}

impl<I: Clone + 'static, K: Clone + 'static> ControllerInner<I, K> {
    fn on_pick_up(&self, element: ElementId, event: &PointerEvent) {
        if !self.stage.is_mounted() {
            return;
        }
        let surface = Rc::clone(self.stage.surface());
        let lifted = {
            let mut tracker = self.tracker.borrow_mut();
            if !tracker.pick_up(surface.as_ref(), element, event) {
                return;
            }
            tracker.item(element).cloned()
        };
        let Some(item) = lifted else {
            return;
        };
        let callback = self.on_pick_up.borrow_mut().take();
        if let Some(mut callback) = callback {
            callback(element, &item);
            let mut slot = self.on_pick_up.borrow_mut();
            if slot.is_none() {
                *slot = Some(callback);
            }
        }
    }

    fn on_move(&self, event: &PointerEvent) {
        if !self.stage.is_mounted() {
            return;
        }
        let surface = Rc::clone(self.stage.surface());
        self.tracker.borrow_mut().drag_to(surface.as_ref(), event);
    }

    fn on_release(this: &Rc<Self>, event: &PointerEvent) {
        if !this.stage.is_mounted() {
            return;
        }
        let pending = this.tracker.borrow_mut().begin_release(event.pointer_id);
        if let Some(report) = Self::settle(this, pending) {
            Self::dispatch(this, report);
        }
    }

    fn on_cancel(this: &Rc<Self>, event: &PointerEvent) {
        if !this.stage.is_mounted() {
            return;
        }
        let pending = this.tracker.borrow_mut().begin_cancel(Some(event.pointer_id));
        if let Some(report) = Self::settle(this, pending) {
            Self::dispatch(this, report);
        }
    }

    /// Resolve with the tracker unborrowed; target closures and the surface
    /// may call back into the controller.
    fn settle(this: &Rc<Self>, pending: Option<PendingDrop<I, K>>) -> Option<DragReport<I, K>> {
        let settled = pending?.settle(this.stage.surface().as_ref())?;
        Some(this.tracker.borrow_mut().commit(settled))
    }

    fn dispatch(this: &Rc<Self>, report: DragReport<I, K>) {
        if !this.stage.is_mounted() {
            return;
        }
        trace!(
            element = ?report.element,
            matched = report.outcome.is_match(),
            missed = report.outcome.is_miss(),
            "drag resolved"
        );
        if report.outcome.is_mismatch() {
            Self::schedule_return(this, report.element, report.origin);
        }

        let callback = this.on_resolve.borrow_mut().take();
        if let Some(mut callback) = callback {
            callback(&report);
            let mut slot = this.on_resolve.borrow_mut();
            if slot.is_none() {
                *slot = Some(callback);
            }
        }
    }

    fn schedule_return(this: &Rc<Self>, element: ElementId, origin: Vec2) {
        let delay = this.config.mismatch_return_ms;
        if delay == 0 {
            let surface = Rc::clone(this.stage.surface());
            this.tracker
                .borrow_mut()
                .complete_return(surface.as_ref(), element, origin);
            return;
        }
        let weak = Rc::downgrade(this);
        this.stage.scope().schedule_once(delay, move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if !inner.stage.is_mounted() {
                return;
            }
            let surface = Rc::clone(inner.stage.surface());
            inner
                .tracker
                .borrow_mut()
                .complete_return(surface.as_ref(), element, origin);
        });
    }
}
