//! JavaScript entry point
//!
//! The page constructs one [`PlayroomApp`] over its stage element and drives
//! it from its menu buttons and visibility events:
//!
//! ```js
//! const app = new PlayroomApp(document.getElementById("stage"));
//! for (const item of JSON.parse(app.menu_json())) { /* render a button */ }
//! app.start("balloon-pop");
//! ```

use std::rc::Rc;

use playroom_activities::register_all;
use playroom_core::{
    ActivityContext, MemoryStorage, Orchestrator, PlayroomConfig, Services, Storage, Store,
};
use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use crate::host::WebHost;
use crate::services::{BurstEvents, SpeechAnnouncer, WebAudio};
use crate::storage::WebStorage;
use crate::surface::DomSurface;

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// The activity suite bound to one page
#[wasm_bindgen]
pub struct PlayroomApp {
    orchestrator: Orchestrator,
    host: Rc<WebHost>,
}

#[wasm_bindgen]
impl PlayroomApp {
    /// Build the suite inside `root`. `config_json` overrides defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(root: HtmlElement, config_json: Option<String>) -> Result<PlayroomApp, JsValue> {
        let config = match config_json {
            Some(json) => PlayroomConfig::from_json(&json).map_err(js_error)?,
            None => PlayroomConfig::default(),
        };
        let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
        let document = window.document().ok_or_else(|| js_error("no document"))?;

        let surface = Rc::new(DomSurface::new(document.clone(), root));
        let host = Rc::new(WebHost::new(window, document, Rc::clone(&surface)));

        let storage: Rc<dyn Storage> = match WebStorage::open() {
            Ok(storage) => Rc::new(storage),
            Err(err) => {
                warn!(%err, "mute preference will not persist");
                Rc::new(MemoryStorage::new())
            }
        };
        let store = Store::load(storage, config.storage_key.clone());
        let services = Services::new(
            Rc::new(WebAudio::new()),
            Rc::new(SpeechAnnouncer::new()),
            Rc::new(BurstEvents::new()),
        )
        .mute_aware(&store);

        let context = ActivityContext::new(host.clone(), services.clone())
            .with_config(Rc::new(config));
        let mut orchestrator = Orchestrator::new(surface, store, services);
        register_all(&mut orchestrator, &context).map_err(js_error)?;
        info!(activities = orchestrator.menu().len(), "playroom ready");

        Ok(PlayroomApp { orchestrator, host })
    }

    /// Mount the activity `id`. On failure the menu is showing again.
    pub fn start(&mut self, id: &str) -> Result<(), JsValue> {
        self.orchestrator.start(id).map_err(js_error)
    }

    pub fn show_menu(&mut self) {
        self.orchestrator.show_menu();
    }

    pub fn restart(&mut self) -> Result<(), JsValue> {
        self.orchestrator.restart().map_err(js_error)
    }

    /// Flip mute and return the new value
    pub fn toggle_mute(&mut self) -> bool {
        self.orchestrator.toggle_mute()
    }

    pub fn is_muted(&self) -> bool {
        self.orchestrator.store().is_muted()
    }

    /// Identifier of the mounted activity
    pub fn current(&self) -> Option<String> {
        self.orchestrator.current().map(str::to_string)
    }

    /// Menu entries as a JSON array of `{id, name, icon}`
    pub fn menu_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.orchestrator.menu()).map_err(js_error)
    }

    /// Current screen as JSON, e.g. `{"screen":"menu","failure":false}`
    pub fn screen_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.orchestrator.screen()).map_err(js_error)
    }

    /// Page hidden
    pub fn pause(&mut self) {
        self.orchestrator.pause();
    }

    /// Page visible again
    pub fn resume(&mut self) {
        self.orchestrator.resume();
    }

    /// Timers, frames and listeners currently held by the browser
    pub fn outstanding(&self) -> usize {
        self.host.outstanding()
    }
}
