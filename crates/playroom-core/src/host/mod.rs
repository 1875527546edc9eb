//! Host abstraction
//!
//! The host is the platform seam every activity runs on: a clock, a source of
//! randomness, timers, animation frames and input listeners. The browser
//! implementation lives in `playroom-web`; a deterministic implementation for
//! tests lives in `playroom-host-mock`.
//!
//! # Contract
//!
//! - Handles are issued by the host and are only meaningful to the host that
//!   issued them.
//! - Clearing a handle that is unknown, already cleared or already fired is a
//!   silent no-op.
//! - Callbacks are never invoked synchronously from inside the call that
//!   registered them.
//! - The host is single-threaded; callbacks run one at a time on the same
//!   logical thread as every other call.

mod event;
mod surface;
mod storage;

use std::rc::Rc;

pub use event::{EventKind, EventTarget, InputEvent, ListenOptions, PointerEvent, PointerId};
pub use storage::{MemoryStorage, Storage};
pub use surface::{ElementId, ElementSpec, Surface};

/// Opaque handle issued by a [`Host`] for a timer, frame or listener
pub type HostHandle = u32;

/// Callback invoked repeatedly by a periodic timer
pub type TaskFn = Rc<dyn Fn()>;

/// Callback invoked once by a one-shot timer
pub type OnceFn = Box<dyn FnOnce()>;

/// Callback invoked once on the next rendering tick with the frame timestamp (ms)
pub type FrameFn = Box<dyn FnOnce(f64)>;

/// Handler invoked for every delivered input event
pub type EventFn = Rc<dyn Fn(&InputEvent)>;

/// Platform services required by the lifecycle framework
pub trait Host {
    /// Monotonic time in milliseconds
    fn now_ms(&self) -> f64;

    /// Uniform random number in `[0, 1)`
    fn random(&self) -> f64;

    /// Invoke `callback` every `interval_ms` until cleared
    fn set_interval(&self, interval_ms: u32, callback: TaskFn) -> HostHandle;

    /// Stop a periodic timer
    fn clear_interval(&self, handle: HostHandle);

    /// Invoke `callback` once after `delay_ms`
    fn set_timeout(&self, delay_ms: u32, callback: OnceFn) -> HostHandle;

    /// Cancel a pending one-shot timer
    fn clear_timeout(&self, handle: HostHandle);

    /// Invoke `callback` on the next rendering tick
    fn request_frame(&self, callback: FrameFn) -> HostHandle;

    /// Cancel a pending frame callback
    fn cancel_frame(&self, handle: HostHandle);

    /// Attach `handler` for events of `kind` delivered to `target`
    fn add_listener(
        &self,
        target: EventTarget,
        kind: EventKind,
        options: ListenOptions,
        handler: EventFn,
    ) -> HostHandle;

    /// Detach a listener
    fn remove_listener(&self, handle: HostHandle);
}
