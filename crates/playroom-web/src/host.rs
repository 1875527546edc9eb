//! Browser host
//!
//! Timers, frames and listeners are gloo handles kept in maps keyed by the
//! host handle; dropping a gloo handle cancels it, so clearing is removal.
//! One-shot timers, frames and once-listeners report themselves after they
//! run and are pruned on the next host call.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::render::{request_animation_frame, AnimationFrame};
use gloo::timers::callback::{Interval, Timeout};
use playroom_core::host::{EventFn, FrameFn, OnceFn, TaskFn};
use playroom_core::{
    EventKind, EventTarget, Host, HostHandle, InputEvent, ListenOptions, PointerEvent, PointerId,
    Surface,
};
use tracing::{debug, trace};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, Performance, Window};

use crate::surface::DomSurface;

type Fired = Rc<RefCell<Vec<HostHandle>>>;

/// [`Host`] backed by the browser event loop
pub struct WebHost {
    window: Window,
    document: Document,
    surface: Rc<DomSurface>,
    performance: Option<Performance>,
    next_handle: Cell<HostHandle>,
    intervals: RefCell<HashMap<HostHandle, Interval>>,
    timeouts: RefCell<HashMap<HostHandle, Timeout>>,
    frames: RefCell<HashMap<HostHandle, AnimationFrame>>,
    listeners: RefCell<HashMap<HostHandle, EventListener>>,
    fired: Fired,
}

impl WebHost {
    pub fn new(window: Window, document: Document, surface: Rc<DomSurface>) -> Self {
        Self {
            performance: window.performance(),
            window,
            document,
            surface,
            next_handle: Cell::new(1),
            intervals: RefCell::new(HashMap::new()),
            timeouts: RefCell::new(HashMap::new()),
            frames: RefCell::new(HashMap::new()),
            listeners: RefCell::new(HashMap::new()),
            fired: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Handles the browser still holds a callback for
    pub fn outstanding(&self) -> usize {
        self.prune();
        self.intervals.borrow().len()
            + self.timeouts.borrow().len()
            + self.frames.borrow().len()
            + self.listeners.borrow().len()
    }

    fn issue(&self) -> HostHandle {
        self.prune();
        let handle = self.next_handle.get();
        self.next_handle.set(handle.wrapping_add(1).max(1));
        handle
    }

    fn prune(&self) {
        let fired: Vec<HostHandle> = self.fired.borrow_mut().drain(..).collect();
        for handle in fired {
            self.timeouts.borrow_mut().remove(&handle);
            self.frames.borrow_mut().remove(&handle);
            self.listeners.borrow_mut().remove(&handle);
        }
    }

    fn dom_target(&self, target: EventTarget) -> Option<web_sys::EventTarget> {
        match target {
            EventTarget::Surface => Some(self.surface.root().clone().into()),
            EventTarget::Element(id) => self.surface.element(id).map(Into::into),
            EventTarget::Document => Some(self.document.clone().into()),
            EventTarget::Window => Some(self.window.clone().into()),
        }
    }
}

/// Translate a DOM event into the host's event model
fn translate(surface: &DomSurface, kind: EventKind, event: &Event) -> Option<InputEvent> {
    if !kind.is_pointer() {
        return Some(InputEvent::Resize(surface.size()));
    }
    let pointer = event.dyn_ref::<web_sys::PointerEvent>()?;
    let position = surface.to_local(pointer.client_x() as f64, pointer.client_y() as f64);
    let target = event
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .and_then(|element| surface.element_id_of(&element));
    Some(InputEvent::Pointer(PointerEvent::new(
        PointerId(pointer.pointer_id()),
        position,
        target,
    )))
}

impl Host for WebHost {
    fn now_ms(&self) -> f64 {
        self.performance
            .as_ref()
            .map_or_else(js_sys::Date::now, |p| p.now())
    }

    fn random(&self) -> f64 {
        js_sys::Math::random()
    }

    fn set_interval(&self, interval_ms: u32, callback: TaskFn) -> HostHandle {
        let handle = self.issue();
        let interval = Interval::new(interval_ms, move || callback());
        self.intervals.borrow_mut().insert(handle, interval);
        trace!(handle, interval_ms, "interval set");
        handle
    }

    fn clear_interval(&self, handle: HostHandle) {
        self.prune();
        self.intervals.borrow_mut().remove(&handle);
    }

    fn set_timeout(&self, delay_ms: u32, callback: OnceFn) -> HostHandle {
        let handle = self.issue();
        let fired = Rc::clone(&self.fired);
        let timeout = Timeout::new(delay_ms, move || {
            callback();
            fired.borrow_mut().push(handle);
        });
        self.timeouts.borrow_mut().insert(handle, timeout);
        handle
    }

    fn clear_timeout(&self, handle: HostHandle) {
        self.prune();
        self.timeouts.borrow_mut().remove(&handle);
    }

    fn request_frame(&self, callback: FrameFn) -> HostHandle {
        let handle = self.issue();
        let fired = Rc::clone(&self.fired);
        let frame = request_animation_frame(move |timestamp| {
            callback(timestamp);
            fired.borrow_mut().push(handle);
        });
        self.frames.borrow_mut().insert(handle, frame);
        handle
    }

    fn cancel_frame(&self, handle: HostHandle) {
        self.prune();
        self.frames.borrow_mut().remove(&handle);
    }

    fn add_listener(
        &self,
        target: EventTarget,
        kind: EventKind,
        options: ListenOptions,
        handler: EventFn,
    ) -> HostHandle {
        let handle = self.issue();
        let Some(dom_target) = self.dom_target(target) else {
            debug!(handle, ?target, "listener target is not attached");
            return handle;
        };
        let dom_options = EventListenerOptions {
            phase: EventListenerPhase::Bubble,
            passive: options.passive,
        };
        let surface = Rc::clone(&self.surface);
        let listener = if options.once {
            let fired = Rc::clone(&self.fired);
            EventListener::once_with_options(&dom_target, kind.dom_name(), dom_options, move |event| {
                if let Some(input) = translate(&surface, kind, event) {
                    handler(&input);
                }
                fired.borrow_mut().push(handle);
            })
        } else {
            EventListener::new_with_options(&dom_target, kind.dom_name(), dom_options, move |event| {
                if let Some(input) = translate(&surface, kind, event) {
                    handler(&input);
                }
            })
        };
        self.listeners.borrow_mut().insert(handle, listener);
        handle
    }

    fn remove_listener(&self, handle: HostHandle) {
        self.prune();
        self.listeners.borrow_mut().remove(&handle);
    }
}
