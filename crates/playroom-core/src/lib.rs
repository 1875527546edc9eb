//! Core of the Playroom activity suite
//!
//! This crate provides everything an activity needs apart from the browser:
//! - Resource ownership: timers, frame callbacks and listeners acquired
//!   through one scope and released together
//! - The activity lifecycle (mount, unmount, pause, resume)
//! - Drag-and-drop gesture recognition and drop resolution
//! - The orchestrator that keeps exactly one activity on screen
//! - Shared state (mute flag) and the service contracts for audio, speech
//!   and celebration effects
//!
//! ## Architecture
//!
//! - [`math`]: Geometry types (`Vec2`, `Rect`, `Size`)
//! - [`host`]: Platform seams (`Host`, `Surface`, `Storage`) and input events
//! - [`scope`]: `ResourceScope`
//! - [`activity`]: `Activity` trait, `Lifecycle`, `Stage`
//! - [`drag`]: `DragController` and the pure `DragTracker`
//! - [`orchestrator`]: `Orchestrator`
//! - [`store`]: Publish/subscribe state with a persisted mute flag
//! - [`services`]: Audio cue, announcer and celebration contracts
//!
//! ## Example
//!
//! ```rust
//! use std::rc::Rc;
//! use playroom_core::{MemoryStorage, PlayroomConfig, Store};
//!
//! let config = PlayroomConfig::from_json(r#"{"drag": {"mismatch_return_ms": 400}}"#).unwrap();
//! let storage = Rc::new(MemoryStorage::with_entry(&config.storage_key, "true"));
//! let store = Store::load(storage, config.storage_key.clone());
//! assert!(store.is_muted());
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure Rust Core**: No browser dependency; everything runs against a mock host in tests
//! 2. **Injected Platform**: Time, randomness, timers and input come from a `Host`
//! 3. **Single Threaded**: Shared state is `Rc` + `RefCell`, never borrowed across a callback

pub mod activity;
pub mod config;
pub mod drag;
pub mod error;
pub mod host;
pub mod math;
pub mod orchestrator;
pub mod scope;
pub mod services;
pub mod store;

pub use activity::{Activity, ActivityContext, ActivityManifest, Lifecycle, MountFlag, Stage};
pub use config::{DragConfig, PlayroomConfig};
pub use drag::{
    DragController, DragReport, DragSession, DragTracker, DropOutcome, DropTarget, PendingDrop,
    SettledDrop,
};
pub use error::{ActivityError, ConfigError, OrchestratorError, StorageError};
pub use host::{
    ElementId, ElementSpec, EventKind, EventTarget, Host, HostHandle, InputEvent, ListenOptions,
    MemoryStorage, PointerEvent, PointerId, Storage, Surface,
};
pub use math::{Rect, Size, Vec2};
pub use orchestrator::{Orchestrator, Screen};
pub use scope::{Handle, ResourceKind, ResourceScope, ScopeStats};
pub use services::{AnimalCall, Announcer, AudioCues, Celebration, Cue, Note, Services};
pub use store::{AppState, StateChange, Store, StoreField, SubscriptionId};
