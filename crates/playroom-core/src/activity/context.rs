//! Per-activity execution context

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::config::PlayroomConfig;
use crate::host::{Host, Surface};
use crate::scope::ResourceScope;
use crate::services::Services;

/// Collaborators an activity is constructed with
#[derive(Clone)]
pub struct ActivityContext {
    pub host: Rc<dyn Host>,
    pub services: Services,
    pub config: Rc<PlayroomConfig>,
}

impl ActivityContext {
    /// Context with default configuration
    pub fn new(host: Rc<dyn Host>, services: Services) -> Self {
        Self {
            host,
            services,
            config: Rc::new(PlayroomConfig::default()),
        }
    }

    pub fn with_config(mut self, config: Rc<PlayroomConfig>) -> Self {
        self.config = config;
        self
    }
}

impl fmt::Debug for ActivityContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivityContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Mount flag of one mount generation.
///
/// Every mount gets a fresh flag. Callbacks capture the flag of the
/// generation that created them, so a leftover callback sees `false` even
/// after the activity has been mounted again.
#[derive(Clone, Debug, Default)]
pub struct MountFlag(Rc<Cell<bool>>);

impl MountFlag {
    pub(crate) fn raised() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    /// Whether this generation is still mounted
    #[inline]
    pub fn is_mounted(&self) -> bool {
        self.0.get()
    }

    pub(crate) fn lower(&self) {
        self.0.set(false);
    }
}

/// Everything a build needs for one mount generation
#[derive(Clone)]
pub struct Stage {
    surface: Rc<dyn Surface>,
    scope: ResourceScope,
    flag: MountFlag,
    context: ActivityContext,
    generation: u64,
}

impl Stage {
    /// Surface the activity owns while mounted
    pub fn surface(&self) -> &Rc<dyn Surface> {
        &self.surface
    }

    /// Scope every resource of this generation must be acquired through
    pub fn scope(&self) -> &ResourceScope {
        &self.scope
    }

    pub fn mount_flag(&self) -> &MountFlag {
        &self.flag
    }

    /// Whether this generation is still mounted
    #[inline]
    pub fn is_mounted(&self) -> bool {
        self.flag.is_mounted()
    }

    pub fn services(&self) -> &Services {
        &self.context.services
    }

    pub fn host(&self) -> &Rc<dyn Host> {
        &self.context.host
    }

    pub fn config(&self) -> &PlayroomConfig {
        &self.context.config
    }

    /// Mount generation, starting at 1
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Uniform random number in `[lo, hi)`
    pub fn random_range(&self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.context.host.random() as f32
    }

    /// Random index into a collection of `len` items; `len` must be non-zero
    pub fn random_index(&self, len: usize) -> usize {
        ((self.context.host.random() * len as f64) as usize).min(len.saturating_sub(1))
    }

    /// Fisher-Yates shuffle driven by the host's randomness
    pub fn shuffle<T>(&self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.random_index(i + 1);
            items.swap(i, j);
        }
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("generation", &self.generation)
            .field("mounted", &self.is_mounted())
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// Lifecycle state embedded in every activity
pub struct Lifecycle {
    context: ActivityContext,
    label: &'static str,
    stage: Option<Stage>,
    generation: u64,
}

impl Lifecycle {
    /// Unmounted lifecycle; `label` tags the scope's log lines
    pub fn new(context: ActivityContext, label: &'static str) -> Self {
        Self {
            context,
            label,
            stage: None,
            generation: 0,
        }
    }

    pub fn context(&self) -> &ActivityContext {
        &self.context
    }

    /// Stage of the current generation, if mounted
    pub fn stage(&self) -> Option<&Stage> {
        self.stage.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.stage.as_ref().is_some_and(Stage::is_mounted)
    }

    /// Number of mounts so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a new generation on `surface`: fresh flag, fresh scope, empty surface
    pub(crate) fn begin(&mut self, surface: Rc<dyn Surface>) -> Stage {
        self.end();
        self.generation += 1;
        surface.clear();
        let stage = Stage {
            scope: ResourceScope::labeled(Rc::clone(&self.context.host), self.label),
            surface,
            flag: MountFlag::raised(),
            context: self.context.clone(),
            generation: self.generation,
        };
        self.stage = Some(stage.clone());
        stage
    }

    /// End the current generation. Returns false if nothing was mounted.
    pub(crate) fn end(&mut self) -> bool {
        let Some(stage) = self.stage.take() else {
            return false;
        };
        stage.flag.lower();
        stage.scope.release_all();
        stage.surface.clear();
        true
    }
}

impl fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifecycle")
            .field("label", &self.label)
            .field("generation", &self.generation)
            .field("mounted", &self.is_mounted())
            .finish()
    }
}
