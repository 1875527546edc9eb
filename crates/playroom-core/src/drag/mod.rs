//! Drag-and-drop gestures
//!
//! One reusable recognizer for every "drag an item onto a target" activity.
//!
//! - Pick-up: pointer-down on a registered, enabled element while idle. The
//!   pointer is captured and the element gets the lifted class.
//! - Move: the element follows the bound pointer, keeping the offset it had
//!   at pick-up. Other pointers are ignored.
//! - Release: the element's center is tested against the targets in
//!   registration order and the first containing target decides:
//!   - **Match** snaps the element onto the target and disables it.
//!   - **Mismatch** sends it back to where it was picked up after a delay.
//!   - **Miss** sends it back immediately.
//! - Cancellation resolves as a miss. Resolving on a detached element
//!   discards the session without a report.

mod controller;
mod resolve;
mod session;
mod target;
mod tracker;

pub use controller::DragController;
pub use resolve::{resolve, DropOutcome};
pub use session::DragSession;
pub use target::{AcceptFn, BoundsFn, DropTarget};
pub use tracker::{DragReport, DragTracker, PendingDrop, SettledDrop};

pub use crate::config::DragConfig;
