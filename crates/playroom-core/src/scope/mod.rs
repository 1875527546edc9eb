//! Resource scopes
//!
//! A [`ResourceScope`] is the single place an activity acquires timers,
//! frame callbacks and input listeners. Every acquisition is recorded, and
//! [`ResourceScope::release_all`] cancels everything still outstanding in
//! one call.
//!
//! # Invariants
//!
//! - Once released, a scope tracks nothing and the host holds no callback
//!   registered through it.
//! - Release is idempotent. So is cancelling a single handle.
//! - A released scope refuses new acquisitions and returns inert handles.
//! - Host callbacks hold only a weak reference to the scope and skip delivery
//!   when their handle is no longer tracked. A callback that was already
//!   running when the scope was released is not interrupted; activity code
//!   checks its mount flag for that case.
//! - No `RefCell` borrow is held while calling into the host or into user
//!   code, so callbacks may freely cancel handles or release their own scope.

mod handle;

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use crate::host::{
    EventFn, EventKind, EventTarget, FrameFn, Host, HostHandle, InputEvent, ListenOptions, OnceFn,
    TaskFn,
};

pub use handle::{Handle, ResourceKind, ScopeStats};

/// Tracks and releases every host resource owned by one activity mount
#[derive(Clone)]
pub struct ResourceScope {
    inner: Rc<ScopeInner>,
}

struct ScopeInner {
    host: Rc<dyn Host>,
    label: String,
    state: RefCell<ScopeState>,
}

struct ScopeState {
    active: bool,
    next_id: u64,
    tracked: HashMap<u64, Tracked>,
}

#[derive(Clone, Copy, Debug)]
struct Tracked {
    kind: ResourceKind,
    host_handle: HostHandle,
}

impl ResourceScope {
    /// Create an active scope on `host`
    pub fn new(host: Rc<dyn Host>) -> Self {
        Self::labeled(host, "scope")
    }

    /// Create an active scope whose log lines carry `label`
    pub fn labeled(host: Rc<dyn Host>, label: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(ScopeInner {
                host,
                label: label.into(),
                state: RefCell::new(ScopeState {
                    active: true,
                    next_id: 1,
                    tracked: HashMap::new(),
                }),
            }),
        }
    }

    /// Host this scope registers with
    pub fn host(&self) -> &Rc<dyn Host> {
        &self.inner.host
    }

    /// Log label
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// Whether the scope still accepts acquisitions
    pub fn is_active(&self) -> bool {
        self.inner.state.borrow().active
    }

    /// Outstanding resources by kind
    pub fn outstanding(&self) -> ScopeStats {
        let state = self.inner.state.borrow();
        let mut stats = ScopeStats::default();
        for tracked in state.tracked.values() {
            stats.count(tracked.kind);
        }
        stats
    }

    /// Whether `handle` is still outstanding
    pub fn is_outstanding(&self, handle: Handle) -> bool {
        self.inner.is_live(handle.id)
    }

    /// Invoke `callback` every `interval_ms` until cancelled or released
    pub fn schedule_periodic(&self, interval_ms: u32, callback: impl Fn() + 'static) -> Handle {
        let Some(id) = self.inner.reserve(ResourceKind::Periodic) else {
            return Handle::inert(ResourceKind::Periodic);
        };
        let weak = Rc::downgrade(&self.inner);
        let task: TaskFn = Rc::new(move || {
            if ScopeInner::check_live(&weak, id) {
                callback();
            }
        });
        let host_handle = self.inner.host.set_interval(interval_ms, task);
        self.inner.commit(id, ResourceKind::Periodic, host_handle)
    }

    /// Invoke `callback` once after `delay_ms` unless cancelled or released first
    pub fn schedule_once(&self, delay_ms: u32, callback: impl FnOnce() + 'static) -> Handle {
        let Some(id) = self.inner.reserve(ResourceKind::Once) else {
            return Handle::inert(ResourceKind::Once);
        };
        let weak = Rc::downgrade(&self.inner);
        let task: OnceFn = Box::new(move || {
            if ScopeInner::check_settle(&weak, id) {
                callback();
            }
        });
        let host_handle = self.inner.host.set_timeout(delay_ms, task);
        self.inner.commit(id, ResourceKind::Once, host_handle)
    }

    /// Invoke `callback` on the next rendering tick.
    ///
    /// A callback that wants to keep animating schedules itself again; every
    /// registration gets its own handle so a loop can be cancelled between
    /// any two frames.
    pub fn schedule_frame(&self, callback: impl FnOnce(f64) + 'static) -> Handle {
        let Some(id) = self.inner.reserve(ResourceKind::Frame) else {
            return Handle::inert(ResourceKind::Frame);
        };
        let weak = Rc::downgrade(&self.inner);
        let task: FrameFn = Box::new(move |timestamp| {
            if ScopeInner::check_settle(&weak, id) {
                callback(timestamp);
            }
        });
        let host_handle = self.inner.host.request_frame(task);
        self.inner.commit(id, ResourceKind::Frame, host_handle)
    }

    /// Attach `handler` for `kind` events on `target`
    pub fn listen(
        &self,
        target: EventTarget,
        kind: EventKind,
        options: ListenOptions,
        handler: impl Fn(&InputEvent) + 'static,
    ) -> Handle {
        let Some(id) = self.inner.reserve(ResourceKind::Listener) else {
            return Handle::inert(ResourceKind::Listener);
        };
        let weak = Rc::downgrade(&self.inner);
        let once = options.once;
        let task: EventFn = Rc::new(move |event| {
            let deliver = if once {
                ScopeInner::check_settle(&weak, id)
            } else {
                ScopeInner::check_live(&weak, id)
            };
            if deliver {
                handler(event);
            }
        });
        let host_handle = self.inner.host.add_listener(target, kind, options, task);
        self.inner.commit(id, ResourceKind::Listener, host_handle)
    }

    /// Cancel one resource. Unknown, fired and already cancelled handles are ignored.
    pub fn cancel(&self, handle: Handle) {
        if handle.is_inert() {
            return;
        }
        let removed = self.inner.state.borrow_mut().tracked.remove(&handle.id);
        if let Some(tracked) = removed {
            trace!(scope = %self.inner.label, ?handle, "cancel");
            self.inner.release_one(tracked);
        }
    }

    /// Cancel every outstanding resource and deactivate the scope.
    ///
    /// Safe to call any number of times, including from inside a callback
    /// owned by this scope.
    pub fn release_all(&self) {
        let drained: Vec<Tracked> = {
            let mut state = self.inner.state.borrow_mut();
            if !state.active {
                return;
            }
            state.active = false;
            state.tracked.drain().map(|(_, tracked)| tracked).collect()
        };
        debug!(scope = %self.inner.label, released = drained.len(), "scope released");
        for tracked in drained {
            self.inner.release_one(tracked);
        }
    }
}

impl fmt::Debug for ResourceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceScope")
            .field("label", &self.inner.label)
            .field("active", &self.is_active())
            .field("outstanding", &self.outstanding())
            .finish()
    }
}

impl ScopeInner {
    fn reserve(&self, kind: ResourceKind) -> Option<u64> {
        let mut state = self.state.borrow_mut();
        if !state.active {
            debug!(scope = %self.label, ?kind, "acquisition refused: scope released");
            return None;
        }
        let id = state.next_id;
        state.next_id += 1;
        Some(id)
    }

    fn commit(&self, id: u64, kind: ResourceKind, host_handle: HostHandle) -> Handle {
        let tracked = Tracked { kind, host_handle };
        let accepted = {
            let mut state = self.state.borrow_mut();
            if state.active {
                state.tracked.insert(id, tracked);
                true
            } else {
                false
            }
        };
        if !accepted {
            self.release_one(tracked);
            return Handle::inert(kind);
        }
        Handle { id, kind }
    }

    fn is_live(&self, id: u64) -> bool {
        let state = self.state.borrow();
        state.active && state.tracked.contains_key(&id)
    }

    /// Remove a one-shot resource that is firing; true if it was still owed a delivery
    fn settle(&self, id: u64) -> bool {
        let mut state = self.state.borrow_mut();
        state.active && state.tracked.remove(&id).is_some()
    }

    fn check_live(weak: &Weak<ScopeInner>, id: u64) -> bool {
        weak.upgrade().is_some_and(|inner| inner.is_live(id))
    }

    fn check_settle(weak: &Weak<ScopeInner>, id: u64) -> bool {
        weak.upgrade().is_some_and(|inner| inner.settle(id))
    }

    fn release_one(&self, tracked: Tracked) {
        match tracked.kind {
            ResourceKind::Periodic => self.host.clear_interval(tracked.host_handle),
            ResourceKind::Once => self.host.clear_timeout(tracked.host_handle),
            ResourceKind::Frame => self.host.cancel_frame(tracked.host_handle),
            ResourceKind::Listener => self.host.remove_listener(tracked.host_handle),
        }
    }
}

impl Drop for ScopeInner {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if !state.active {
            return;
        }
        state.active = false;
        let drained: Vec<Tracked> = state.tracked.drain().map(|(_, tracked)| tracked).collect();
        if !drained.is_empty() {
            debug!(scope = %self.label, released = drained.len(), "scope dropped while active");
        }
        for tracked in drained {
            self.release_one(tracked);
        }
    }
}
