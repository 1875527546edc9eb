//! Orchestrator
//!
//! Owns every registered activity and the shared surface, and keeps at most
//! one activity mounted. A transition always unmounts the current activity
//! before the next one mounts.

mod registry;

use std::rc::Rc;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::activity::{Activity, ActivityManifest};
use crate::error::OrchestratorError;
use crate::host::Surface;
use crate::services::{Cue, Services};
use crate::store::{StateChange, Store};

pub use registry::ActivityRegistry;

/// What the shell is showing
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", rename_all = "lowercase")]
pub enum Screen {
    /// Activity picker; `failure` is set when the last start failed to mount
    Menu { failure: bool },
    /// A mounted activity
    Activity { id: &'static str },
}

/// Top-level controller enforcing a single mounted activity
pub struct Orchestrator {
    registry: ActivityRegistry,
    current: Option<&'static str>,
    surface: Rc<dyn Surface>,
    store: Store,
    services: Services,
    screen: Screen,
}

impl Orchestrator {
    pub fn new(surface: Rc<dyn Surface>, store: Store, services: Services) -> Self {
        Self {
            registry: ActivityRegistry::new(),
            current: None,
            surface,
            store,
            services,
            screen: Screen::Menu { failure: false },
        }
    }

    /// Register an activity; menu order is registration order
    pub fn register(&mut self, activity: Box<dyn Activity>) -> Result<(), OrchestratorError> {
        self.registry.insert(activity)
    }

    pub fn menu(&self) -> Vec<&'static ActivityManifest> {
        self.registry.manifests()
    }

    /// Identifier of the mounted activity
    pub fn current(&self) -> Option<&'static str> {
        self.current
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn activity(&self, id: &str) -> Option<&dyn Activity> {
        self.registry.get(id)
    }

    /// Number of mounted activities; never more than one
    pub fn mounted_count(&self) -> usize {
        self.registry.mounted_count()
    }

    /// Mount `id`, unmounting the current activity first.
    ///
    /// Starting the current activity again remounts it. An unknown id changes
    /// nothing. A failed mount sends the shell back to the menu with the
    /// failure flag set.
    pub fn start(&mut self, id: &str) -> Result<(), OrchestratorError> {
        let Some(target_id) = self.registry.get(id).map(|a| a.id()) else {
            warn!(activity = id, "start: not registered");
            return Err(OrchestratorError::NotFound(id.to_string()));
        };

        if let Some(current) = self.current.take() {
            if current != target_id {
                if let Some(activity) = self.registry.get_mut(current) {
                    activity.unmount();
                }
            }
        }

        let surface = Rc::clone(&self.surface);
        let Some(activity) = self.registry.get_mut(target_id) else {
            return Err(OrchestratorError::NotFound(id.to_string()));
        };
        match activity.mount(surface) {
            Ok(()) => {
                info!(activity = target_id, "activity started");
                self.current = Some(target_id);
                self.screen = Screen::Activity { id: target_id };
                self.store
                    .set(StateChange::CurrentActivity(Some(target_id.to_string())));
                self.services.audio.play_cue(Cue::Pop);
                Ok(())
            }
            Err(source) => {
                error!(activity = target_id, error = %source, "activity failed to mount");
                activity.unmount();
                self.enter_menu(true);
                Err(OrchestratorError::MountFailed {
                    id: target_id.to_string(),
                    source,
                })
            }
        }
    }

    /// Remount the current activity; does nothing on the menu
    pub fn restart(&mut self) -> Result<(), OrchestratorError> {
        match self.current {
            Some(id) => self.start(id),
            None => Ok(()),
        }
    }

    /// Unmount the current activity and show the menu
    pub fn show_menu(&mut self) {
        self.enter_menu(false);
    }

    /// Forward to the current activity
    pub fn pause(&mut self) {
        if let Some(activity) = self.current.and_then(|id| self.registry.get_mut(id)) {
            activity.pause();
        }
    }

    /// Forward to the current activity
    pub fn resume(&mut self) {
        if let Some(activity) = self.current.and_then(|id| self.registry.get_mut(id)) {
            activity.resume();
        }
    }

    /// Flip the mute flag and return the new value. Muting cuts off speech.
    pub fn toggle_mute(&mut self) -> bool {
        let muted = self.store.toggle_muted();
        info!(muted, "mute toggled");
        if muted {
            self.services.voice.stop();
        }
        self.services.audio.play_cue(Cue::Pop);
        muted
    }

    fn enter_menu(&mut self, failure: bool) {
        if let Some(current) = self.current.take() {
            if let Some(activity) = self.registry.get_mut(current) {
                activity.unmount();
            }
        }
        self.surface.clear();
        self.screen = Screen::Menu { failure };
        self.store.set(StateChange::CurrentActivity(None));
        self.services.audio.play_cue(Cue::Pop);
    }
}
