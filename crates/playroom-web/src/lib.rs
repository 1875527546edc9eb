//! Browser host for Playroom
//!
//! Binds the activity suite to a real page.
//!
//! ## Module Structure
//!
//! - `app` - `PlayroomApp`, the object the page script talks to
//! - `host` - timers, animation frames and DOM listeners through gloo
//! - `surface` - DOM-backed surface
//! - `storage` - `localStorage` persistence for the mute flag
//! - `services` - Web Audio cues, speech synthesis, burst events
//! - `logging` - `tracing` output to the browser console

// =============================================================================
// Module declarations
// =============================================================================

mod app;
pub mod host;
pub mod logging;
pub mod services;
pub mod storage;
pub mod surface;

// =============================================================================
// Public re-exports
// =============================================================================

pub use app::PlayroomApp;
pub use host::WebHost;
pub use services::{BurstEvents, SpeechAnnouncer, WebAudio, BURST_EVENT};
pub use storage::WebStorage;
pub use surface::DomSurface;

use wasm_bindgen::prelude::*;

/// Runs once when the module is instantiated
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    let level = if cfg!(debug_assertions) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    logging::init(level);
}
