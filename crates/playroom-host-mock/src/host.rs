//! Virtual-clock host

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use playroom_core::host::{EventFn, FrameFn, OnceFn, TaskFn};
use playroom_core::{
    ElementId, EventKind, EventTarget, Host, HostHandle, InputEvent, ListenOptions, PointerEvent,
    PointerId, Size, Vec2,
};
use tracing::trace;

/// Mock host for unit testing
///
/// Time only moves when the test calls [`MockHost::advance`]. Timers that
/// fall due during an advance fire in due-time order (registration order on
/// ties), each with the clock set to its due time. Frame callbacks run only
/// on [`MockHost::run_frame`].
pub struct MockHost {
    /// Simulated time in milliseconds
    now: Cell<f64>,
    /// Random seed for deterministic testing
    random_seed: Cell<u64>,
    /// Values returned by `random` before falling back to the generator
    scripted_random: RefCell<VecDeque<f64>>,
    next_handle: Cell<HostHandle>,
    intervals: RefCell<BTreeMap<HostHandle, MockInterval>>,
    timeouts: RefCell<BTreeMap<HostHandle, MockTimeout>>,
    frames: RefCell<BTreeMap<HostHandle, FrameFn>>,
    listeners: RefCell<BTreeMap<HostHandle, MockListener>>,
}

struct MockInterval {
    period: f64,
    next_due: f64,
    callback: TaskFn,
}

struct MockTimeout {
    due: f64,
    callback: OnceFn,
}

struct MockListener {
    target: EventTarget,
    kind: EventKind,
    once: bool,
    handler: EventFn,
}

#[derive(Clone, Copy)]
enum Due {
    Interval(HostHandle),
    Timeout(HostHandle),
}

/// Duration of one simulated frame (ms)
pub const FRAME_MS: f64 = 16.0;

impl MockHost {
    /// Create a new mock host at time zero
    pub fn new() -> Self {
        Self {
            now: Cell::new(0.0),
            random_seed: Cell::new(12345),
            scripted_random: RefCell::new(VecDeque::new()),
            next_handle: Cell::new(1),
            intervals: RefCell::new(BTreeMap::new()),
            timeouts: RefCell::new(BTreeMap::new()),
            frames: RefCell::new(BTreeMap::new()),
            listeners: RefCell::new(BTreeMap::new()),
        }
    }

    /// Create a shared mock host
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    /// Set the random seed for deterministic testing
    pub fn set_random_seed(&self, seed: u64) {
        self.random_seed.set(seed);
    }

    /// Make the next calls to `random` return `values`, in order
    pub fn script_random(&self, values: impl IntoIterator<Item = f64>) {
        self.scripted_random.borrow_mut().extend(values);
    }

    /// Advance the clock by `ms`, firing every timer that falls due
    pub fn advance(&self, ms: f64) {
        let target = self.now.get() + ms;
        while let Some((due_at, due)) = self.next_due(target) {
            if due_at > self.now.get() {
                self.now.set(due_at);
            }
            self.fire(due);
        }
        self.now.set(target);
    }

    /// Run every frame callback pending at the time of the call.
    /// Callbacks registered while running wait for the next frame.
    pub fn run_frame(&self) -> usize {
        let pending: Vec<HostHandle> = self.frames.borrow().keys().copied().collect();
        let timestamp = self.now.get();
        let mut ran = 0;
        for handle in pending {
            let callback = self.frames.borrow_mut().remove(&handle);
            if let Some(callback) = callback {
                callback(timestamp);
                ran += 1;
            }
        }
        ran
    }

    /// Advance one frame duration, then run a frame
    pub fn tick(&self) -> usize {
        self.advance(FRAME_MS);
        self.run_frame()
    }

    /// Deliver `event` to every listener for `kind` whose target matches.
    ///
    /// Pointer events reach element listeners of their target, then surface
    /// listeners (when the target is inside the surface), then document and
    /// window listeners. Returns the number of handlers invoked.
    pub fn dispatch(&self, kind: EventKind, event: InputEvent) -> usize {
        let element = event.as_pointer().and_then(|p| p.target);
        let order = |target: &EventTarget| -> Option<u8> {
            match target {
                EventTarget::Element(id) if Some(*id) == element => Some(0),
                EventTarget::Surface if element.is_some() => Some(1),
                EventTarget::Document if kind.is_pointer() => Some(2),
                EventTarget::Window => Some(3),
                _ => None,
            }
        };

        let mut matching: Vec<(u8, HostHandle)> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, l)| l.kind == kind)
            .filter_map(|(handle, l)| order(&l.target).map(|rank| (rank, *handle)))
            .collect();
        matching.sort();

        let mut delivered = 0;
        for (_, handle) in matching {
            let handler = {
                let mut listeners = self.listeners.borrow_mut();
                let once = listeners.get(&handle).map(|l| l.once);
                match once {
                    Some(true) => listeners.remove(&handle).map(|l| l.handler),
                    Some(false) => listeners.get(&handle).map(|l| Rc::clone(&l.handler)),
                    None => None,
                }
            };
            if let Some(handler) = handler {
                handler(&event);
                delivered += 1;
            }
        }
        trace!(?kind, delivered, "mock dispatch");
        delivered
    }

    pub fn pointer_down(&self, pointer: i32, at: Vec2, target: Option<ElementId>) -> usize {
        self.dispatch_pointer(EventKind::PointerDown, pointer, at, target)
    }

    pub fn pointer_move(&self, pointer: i32, at: Vec2) -> usize {
        self.dispatch_pointer(EventKind::PointerMove, pointer, at, None)
    }

    pub fn pointer_up(&self, pointer: i32, at: Vec2) -> usize {
        self.dispatch_pointer(EventKind::PointerUp, pointer, at, None)
    }

    pub fn pointer_cancel(&self, pointer: i32) -> usize {
        self.dispatch_pointer(EventKind::PointerCancel, pointer, Vec2::ZERO, None)
    }

    pub fn resize(&self, size: Size) -> usize {
        self.dispatch(EventKind::Resize, InputEvent::Resize(size))
    }

    fn dispatch_pointer(&self, kind: EventKind, pointer: i32, at: Vec2, target: Option<ElementId>) -> usize {
        let event = PointerEvent::new(PointerId(pointer), at, target);
        self.dispatch(kind, InputEvent::Pointer(event))
    }

    /// Number of registered periodic timers
    pub fn pending_intervals(&self) -> usize {
        self.intervals.borrow().len()
    }

    /// Number of one-shot timers that have not fired
    pub fn pending_timeouts(&self) -> usize {
        self.timeouts.borrow().len()
    }

    /// Number of frame callbacks waiting for the next frame
    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    /// Number of attached listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Number of listeners attached to `target`
    pub fn listeners_on(&self, target: EventTarget) -> usize {
        self.listeners
            .borrow()
            .values()
            .filter(|l| l.target == target)
            .count()
    }

    /// Everything the host still holds a callback for
    pub fn outstanding(&self) -> usize {
        self.pending_intervals() + self.pending_timeouts() + self.pending_frames() + self.listener_count()
    }

    fn issue_handle(&self) -> HostHandle {
        let handle = self.next_handle.get();
        self.next_handle.set(handle + 1);
        handle
    }

    fn next_due(&self, limit: f64) -> Option<(f64, Due)> {
        let intervals = self.intervals.borrow();
        let timeouts = self.timeouts.borrow();
        let interval_due = intervals
            .iter()
            .map(|(handle, i)| (i.next_due, *handle, Due::Interval(*handle)));
        let timeout_due = timeouts
            .iter()
            .map(|(handle, t)| (t.due, *handle, Due::Timeout(*handle)));
        interval_due
            .chain(timeout_due)
            .filter(|(due, _, _)| *due <= limit)
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(due, _, kind)| (due, kind))
    }

    fn fire(&self, due: Due) {
        match due {
            Due::Interval(handle) => {
                let callback = {
                    let mut intervals = self.intervals.borrow_mut();
                    let Some(interval) = intervals.get_mut(&handle) else {
                        return;
                    };
                    interval.next_due += interval.period;
                    Rc::clone(&interval.callback)
                };
                callback();
            }
            Due::Timeout(handle) => {
                let timeout = self.timeouts.borrow_mut().remove(&handle);
                if let Some(timeout) = timeout {
                    (timeout.callback)();
                }
            }
        }
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for MockHost {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }

    fn random(&self) -> f64 {
        if let Some(value) = self.scripted_random.borrow_mut().pop_front() {
            return value;
        }
        // Simple LCG for deterministic "random" numbers in tests
        let seed = self
            .random_seed
            .get()
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.random_seed.set(seed);
        (seed >> 11) as f64 / (1u64 << 53) as f64
    }

    fn set_interval(&self, interval_ms: u32, callback: TaskFn) -> HostHandle {
        let handle = self.issue_handle();
        let period = f64::from(interval_ms.max(1));
        self.intervals.borrow_mut().insert(
            handle,
            MockInterval {
                period,
                next_due: self.now.get() + period,
                callback,
            },
        );
        handle
    }

    fn clear_interval(&self, handle: HostHandle) {
        self.intervals.borrow_mut().remove(&handle);
    }

    fn set_timeout(&self, delay_ms: u32, callback: OnceFn) -> HostHandle {
        let handle = self.issue_handle();
        self.timeouts.borrow_mut().insert(
            handle,
            MockTimeout {
                due: self.now.get() + f64::from(delay_ms),
                callback,
            },
        );
        handle
    }

    fn clear_timeout(&self, handle: HostHandle) {
        self.timeouts.borrow_mut().remove(&handle);
    }

    fn request_frame(&self, callback: FrameFn) -> HostHandle {
        let handle = self.issue_handle();
        self.frames.borrow_mut().insert(handle, callback);
        handle
    }

    fn cancel_frame(&self, handle: HostHandle) {
        self.frames.borrow_mut().remove(&handle);
    }

    fn add_listener(
        &self,
        target: EventTarget,
        kind: EventKind,
        options: ListenOptions,
        handler: EventFn,
    ) -> HostHandle {
        let handle = self.issue_handle();
        self.listeners.borrow_mut().insert(
            handle,
            MockListener {
                target,
                kind,
                once: options.once,
                handler,
            },
        );
        handle
    }

    fn remove_listener(&self, handle: HostHandle) {
        self.listeners.borrow_mut().remove(&handle);
    }
}
