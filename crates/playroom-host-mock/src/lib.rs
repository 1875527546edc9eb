//! Mock host implementation for testing Playroom
//!
//! Provides deterministic implementations of every platform seam so the core
//! and the activities can be tested without a browser:
//! - [`MockHost`]: virtual clock, timers, frame callbacks and input dispatch
//! - [`MockSurface`]: in-memory element tree with explicit geometry
//! - [`RecordingServices`]: audio, speech and celebration calls captured for assertions
//! - [`gesture`]: helpers that drive complete pointer gestures

pub mod gesture;
mod host;
mod services;
mod surface;

pub use host::{MockHost, FRAME_MS};
pub use services::{Burst, RecordingAnnouncer, RecordingAudio, RecordingCelebration, RecordingServices};
pub use surface::MockSurface;
