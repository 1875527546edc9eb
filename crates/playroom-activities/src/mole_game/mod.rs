//! Whack-a-Mole
//!
//! A mole pops out of one of six holes at a time and ducks back after a
//! while. Tapping it scores; golden moles are rare and worth more. Every
//! fifth catch raises the level, which makes moles appear more often and
//! stay out for less time.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use playroom_core::scope::Handle;
use playroom_core::{
    Activity, ActivityContext, ActivityError, ActivityManifest, Cue, ElementId, ElementSpec,
    EventKind, EventTarget, Lifecycle, ListenOptions, Size, Stage, Vec2,
};
use tracing::{debug, info};

use crate::layout::{grid, level_text, require_size, score_text};
use crate::manifest::MOLE_GAME_MANIFEST;

pub const HOLE_COUNT: usize = 6;

/// Catches per level
pub const MOLES_PER_LEVEL: u32 = 5;

pub const MOLE_POINTS: u32 = 10;
pub const GOLDEN_POINTS: u32 = 50;

/// Probability that a mole is golden
pub const GOLDEN_CHANCE: f32 = 0.1;

/// Delay between a catch and the mole ducking (ms)
pub const CAUGHT_HIDE_MS: u32 = 300;

/// Length of the duck animation (ms)
pub const DUCK_MS: u32 = 200;

/// How long the level-up message stays (ms)
pub const LEVEL_UP_MESSAGE_MS: u32 = 2000;

const BASE_DISPLAY_MS: u32 = 2000;
const MIN_DISPLAY_MS: u32 = 800;
const DISPLAY_STEP_MS: u32 = 100;
const BASE_SPAWN_MS: u32 = 1000;
const MIN_SPAWN_MS: u32 = 500;
const SPAWN_STEP_MS: u32 = 50;

const MOLE: &str = "🐹";
const GOLDEN_MOLE: &str = "👑";
const MOLE_BURST: u32 = 20;
const GOLDEN_BURST: u32 = 40;
const LEVEL_BURST: u32 = 50;

const COLUMNS: usize = 3;
const HOLE_SIZE: Size = Size::new(140.0, 120.0);
const GRID_TOP: f32 = 140.0;
const ROW_GAP: f32 = 40.0;
const MIN_SURFACE: Size = Size::new(560.0, 480.0);

/// How long a mole stays out on `level` (ms)
pub fn display_time(level: u32) -> u32 {
    BASE_DISPLAY_MS
        .saturating_sub(level.saturating_sub(1) * DISPLAY_STEP_MS)
        .max(MIN_DISPLAY_MS)
}

/// Delay between spawn attempts on `level` (ms)
pub fn spawn_interval(level: u32) -> u32 {
    BASE_SPAWN_MS
        .saturating_sub(level.saturating_sub(1) * SPAWN_STEP_MS)
        .max(MIN_SPAWN_MS)
}

/// Tap the moles
pub struct MoleGame {
    lifecycle: Lifecycle,
    field: Option<Rc<Field>>,
}

struct Field {
    stage: Stage,
    score_label: ElementId,
    level_label: ElementId,
    message: ElementId,
    moles: Vec<ElementId>,
    state: RefCell<FieldState>,
    spawner: Cell<Option<Handle>>,
}

#[derive(Default)]
struct FieldState {
    level: u32,
    score: u32,
    caught: u32,
    active: Option<ActiveMole>,
}

struct ActiveMole {
    hole: usize,
    golden: bool,
    caught: bool,
    ducking: bool,
    hide_timer: Option<Handle>,
}

impl MoleGame {
    pub fn new(context: ActivityContext) -> Self {
        Self {
            lifecycle: Lifecycle::new(context, MOLE_GAME_MANIFEST.id),
            field: None,
        }
    }

    pub fn level(&self) -> u32 {
        self.field.as_ref().map_or(0, |f| f.state.borrow().level)
    }

    pub fn score(&self) -> u32 {
        self.field.as_ref().map_or(0, |f| f.state.borrow().score)
    }

    /// Moles caught during this mount
    pub fn caught(&self) -> u32 {
        self.field.as_ref().map_or(0, |f| f.state.borrow().caught)
    }

    /// Mole elements, one per hole
    pub fn moles(&self) -> Vec<ElementId> {
        self.field
            .as_ref()
            .map(|f| f.moles.clone())
            .unwrap_or_default()
    }

    /// Mole element currently out of its hole
    pub fn active_mole(&self) -> Option<ElementId> {
        let field = self.field.as_ref()?;
        let hole = field.state.borrow().active.as_ref()?.hole;
        field.moles.get(hole).copied()
    }

    pub fn level_up_message(&self) -> Option<ElementId> {
        self.field.as_ref().map(|f| f.message)
    }
}

impl Activity for MoleGame {
    fn manifest(&self) -> &'static ActivityManifest {
        &MOLE_GAME_MANIFEST
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn build(&mut self, stage: &Stage) -> Result<(), ActivityError> {
        let surface = stage.surface();
        let size = surface.size();
        require_size(self.id(), size, MIN_SURFACE)?;

        let hud = surface.append(None, ElementSpec::new("score-hud").at(Vec2::new(20.0, 20.0)));
        let score_label = surface.append(Some(hud), ElementSpec::new("score-display").text(score_text(0)));
        let level_label = surface.append(Some(hud), ElementSpec::new("level-display").text(level_text(1)));
        let message = surface.append(
            None,
            ElementSpec::new("level-up-message").text("Niveau suivant!"),
        );
        let area = surface.append(
            None,
            ElementSpec::new("mole-holes-grid")
                .at(Vec2::new(0.0, GRID_TOP))
                .sized(Size::new(size.width, size.height - GRID_TOP)),
        );

        let rows = HOLE_COUNT.div_ceil(COLUMNS);
        let moles = grid(COLUMNS, rows, HOLE_SIZE, ROW_GAP, size.width, GRID_TOP)
            .into_iter()
            .take(HOLE_COUNT)
            .map(|position| {
                let element = surface.append(
                    Some(area),
                    ElementSpec::new("mole-hole").at(position).sized(HOLE_SIZE),
                );
                surface.append(
                    Some(element),
                    ElementSpec::new("hole-background").at(position).sized(HOLE_SIZE),
                );
                let mole = surface.append(
                    Some(element),
                    ElementSpec::new("mole-character").at(position).sized(HOLE_SIZE),
                );
                surface.set_class(mole, "hidden", true);
                mole
            })
            .collect();

        let field = Rc::new(Field {
            stage: stage.clone(),
            score_label,
            level_label,
            message,
            moles,
            state: RefCell::new(FieldState {
                level: 1,
                ..FieldState::default()
            }),
            spawner: Cell::new(None),
        });
        for (index, mole) in field.moles.iter().enumerate() {
            let weak = Rc::downgrade(&field);
            stage.scope().listen(
                EventTarget::Element(*mole),
                EventKind::PointerDown,
                ListenOptions::default(),
                move |_| {
                    if let Some(field) = weak.upgrade() {
                        field.whack(index);
                    }
                },
            );
        }
        field.start_spawning();
        self.field = Some(field);

        stage.services().audio.play_cue(Cue::Pop);
        stage.services().voice.speak("Attrape les taupes !");
        Ok(())
    }

    fn teardown(&mut self) {
        self.field = None;
    }

    fn pause(&mut self) {
        if let Some(field) = &self.field {
            field.stop_spawning();
        }
    }

    fn resume(&mut self) {
        if let Some(field) = &self.field {
            field.start_spawning();
        }
    }
}

impl Field {
    /// Run `f` after `delay_ms` if the field is still alive and mounted
    fn later(self: &Rc<Self>, delay_ms: u32, f: impl FnOnce(&Rc<Field>) + 'static) -> Handle {
        let weak = Rc::downgrade(self);
        self.stage.scope().schedule_once(delay_ms, move || {
            if let Some(field) = weak.upgrade() {
                if field.stage.is_mounted() {
                    f(&field);
                }
            }
        })
    }

    fn start_spawning(self: &Rc<Self>) {
        if !self.stage.is_mounted() || self.spawner.get().is_some() {
            return;
        }
        let interval = spawn_interval(self.state.borrow().level);
        let weak = Rc::downgrade(self);
        let handle = self.stage.scope().schedule_periodic(interval, move || {
            if let Some(field) = weak.upgrade() {
                field.spawn();
            }
        });
        self.spawner.set(Some(handle));
    }

    fn stop_spawning(&self) {
        if let Some(handle) = self.spawner.take() {
            self.stage.scope().cancel(handle);
        }
    }

    fn spawn(self: &Rc<Self>) {
        if !self.stage.is_mounted() || self.state.borrow().active.is_some() {
            return;
        }
        let hole = self.stage.random_index(self.moles.len());
        let golden = self.stage.random_range(0.0, 1.0) < GOLDEN_CHANCE;
        let mole = self.moles[hole];

        let surface = self.stage.surface();
        surface.set_text(mole, if golden { GOLDEN_MOLE } else { MOLE });
        surface.set_class(mole, "golden-mole", golden);
        surface.set_class(mole, "hidden", false);
        surface.set_class(mole, "popping-up", true);

        let level = self.state.borrow().level;
        let hide_timer = self.later(display_time(level), move |field| field.duck(hole));
        self.state.borrow_mut().active = Some(ActiveMole {
            hole,
            golden,
            caught: false,
            ducking: false,
            hide_timer: Some(hide_timer),
        });
        debug!(activity = MOLE_GAME_MANIFEST.id, hole, golden, "mole up");
    }

    fn duck(self: &Rc<Self>, hole: usize) {
        {
            let mut state = self.state.borrow_mut();
            let Some(active) = state.active.as_mut().filter(|a| a.hole == hole) else {
                return;
            };
            if active.ducking {
                return;
            }
            active.ducking = true;
            active.hide_timer = None;
        }
        let mole = self.moles[hole];
        let surface = self.stage.surface();
        surface.set_class(mole, "popping-up", false);
        surface.set_class(mole, "popping-down", true);

        self.later(DUCK_MS, move |field| {
            let surface = field.stage.surface();
            surface.set_class(mole, "hidden", true);
            surface.set_class(mole, "popping-down", false);
            surface.set_class(mole, "golden-mole", false);
            field.state.borrow_mut().active = None;
        });
    }

    fn whack(self: &Rc<Self>, hole: usize) {
        if !self.stage.is_mounted() {
            return;
        }
        let (golden, hide_timer, score, level_up) = {
            let mut state = self.state.borrow_mut();
            let Some(active) = state.active.as_mut().filter(|a| a.hole == hole) else {
                return;
            };
            if active.caught || active.ducking {
                return;
            }
            active.caught = true;
            let golden = active.golden;
            let hide_timer = active.hide_timer.take();
            state.score += if golden { GOLDEN_POINTS } else { MOLE_POINTS };
            state.caught += 1;
            (golden, hide_timer, state.score, state.caught % MOLES_PER_LEVEL == 0)
        };
        if let Some(handle) = hide_timer {
            self.stage.scope().cancel(handle);
        }

        let mole = self.moles[hole];
        let surface = self.stage.surface();
        let services = self.stage.services();
        surface.set_class(mole, "caught", true);
        surface.set_text(self.score_label, &score_text(score));
        if level_up {
            self.level_up();
        }
        if golden {
            services.audio.play_cue(Cue::Chime);
            services.voice.speak("Taupe magique !");
        } else {
            services.audio.play_cue(Cue::Success);
        }
        if let Some(rect) = surface.bounds(mole) {
            let center = rect.center();
            let count = if golden { GOLDEN_BURST } else { MOLE_BURST };
            services.effects.burst(center.x, center.y, count);
        }

        self.later(CAUGHT_HIDE_MS, move |field| {
            field.duck(hole);
            field.stage.surface().set_class(mole, "caught", false);
        });
        debug!(activity = MOLE_GAME_MANIFEST.id, hole, golden, score, "mole caught");
    }

    fn level_up(self: &Rc<Self>) {
        let level = {
            let mut state = self.state.borrow_mut();
            state.level += 1;
            state.level
        };
        let surface = self.stage.surface();
        let services = self.stage.services();
        services.voice.speak(&format!("Niveau {level} !"));
        surface.set_text(self.level_label, &level_text(level));
        surface.set_class(self.message, "show", true);
        self.later(LEVEL_UP_MESSAGE_MS, |field| {
            field.stage.surface().set_class(field.message, "show", false);
        });
        services.audio.play_cue(Cue::Success);
        let center = surface.size().half();
        services.effects.burst(center.x, center.y, LEVEL_BURST);

        // Restart the spawner at the new pace
        if self.spawner.get().is_some() {
            self.stop_spawning();
            self.start_spawning();
        }
        info!(activity = MOLE_GAME_MANIFEST.id, level, "level up");
    }
}
