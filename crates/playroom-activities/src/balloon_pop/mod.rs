//! Balloon Pop
//!
//! Balloons rise from below the surface at random speeds. Tapping one pops
//! it with a sound, its spoken color and a burst of confetti. Demonstrates:
//! - Self-rescheduling frame loops, one handle per frame
//! - Cancelling a single loop while the rest keep running
//! - Pausing and resuming a periodic spawner

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use playroom_core::scope::Handle;
use playroom_core::{
    Activity, ActivityContext, ActivityError, ActivityManifest, Cue, ElementId, ElementSpec,
    EventKind, EventTarget, Lifecycle, ListenOptions, Size, Stage, Vec2,
};
use tracing::debug;

use crate::catalog::{BalloonColor, BALLOON_COLORS};
use crate::manifest::BALLOON_POP_MANIFEST;

/// Delay between two spawned balloons (ms)
pub const SPAWN_INTERVAL_MS: u32 = 1500;

/// Delay between a pop and the removal of the balloon (ms)
pub const POP_REMOVE_MS: u32 = 200;

/// Particles per pop
pub const POP_BURST: u32 = 25;

/// Rise speed range (px per frame)
pub const MIN_SPEED: f32 = 2.0;
pub const MAX_SPEED: f32 = 7.0;

const BALLOON_SIZE: Size = Size::new(80.0, 100.0);

/// How far above the surface a balloon travels before it is dropped
const ESCAPE_MARGIN: f32 = 100.0;

/// Tap-to-pop balloons
pub struct BalloonPop {
    lifecycle: Lifecycle,
    sky: Option<Rc<Sky>>,
}

struct Sky {
    stage: Stage,
    field: ElementId,
    balloons: RefCell<Vec<Rc<Balloon>>>,
    spawner: Cell<Option<Handle>>,
    popped: Cell<u32>,
}

struct Balloon {
    element: ElementId,
    color: &'static BalloonColor,
    speed: f32,
    popped: Cell<bool>,
    frame: Cell<Option<Handle>>,
    listener: Cell<Option<Handle>>,
}

impl BalloonPop {
    pub fn new(context: ActivityContext) -> Self {
        Self {
            lifecycle: Lifecycle::new(context, BALLOON_POP_MANIFEST.id),
            sky: None,
        }
    }

    /// Balloons currently rising
    pub fn live_balloons(&self) -> Vec<ElementId> {
        self.sky
            .as_ref()
            .map(|sky| sky.balloons.borrow().iter().map(|b| b.element).collect())
            .unwrap_or_default()
    }

    /// Balloons popped during this mount
    pub fn popped_count(&self) -> u32 {
        self.sky.as_ref().map_or(0, |sky| sky.popped.get())
    }
}

impl Activity for BalloonPop {
    fn manifest(&self) -> &'static ActivityManifest {
        &BALLOON_POP_MANIFEST
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn build(&mut self, stage: &Stage) -> Result<(), ActivityError> {
        let surface = stage.surface();
        surface.append(
            None,
            ElementSpec::new("balloon-instruction").text("🎈 Éclate les ballons!"),
        );
        let field = surface.append(
            None,
            ElementSpec::new("balloon-field")
                .at(Vec2::ZERO)
                .sized(surface.size()),
        );

        let sky = Rc::new(Sky {
            stage: stage.clone(),
            field,
            balloons: RefCell::new(Vec::new()),
            spawner: Cell::new(None),
            popped: Cell::new(0),
        });
        sky.spawn();
        sky.start_spawning();
        self.sky = Some(sky);

        stage.services().audio.play_cue(Cue::Pop);
        stage.services().voice.speak("Éclate les ballons!");
        Ok(())
    }

    fn teardown(&mut self) {
        self.sky = None;
    }

    fn pause(&mut self) {
        if let Some(sky) = &self.sky {
            if let Some(handle) = sky.spawner.take() {
                sky.stage.scope().cancel(handle);
                debug!(activity = BALLOON_POP_MANIFEST.id, "spawner paused");
            }
        }
    }

    fn resume(&mut self) {
        if let Some(sky) = &self.sky {
            sky.start_spawning();
        }
    }
}

impl Sky {
    fn start_spawning(self: &Rc<Self>) {
        if !self.stage.is_mounted() || self.spawner.get().is_some() {
            return;
        }
        let weak = Rc::downgrade(self);
        let handle = self.stage.scope().schedule_periodic(SPAWN_INTERVAL_MS, move || {
            if let Some(sky) = weak.upgrade() {
                sky.spawn();
            }
        });
        self.spawner.set(Some(handle));
    }

    fn spawn(self: &Rc<Self>) {
        if !self.stage.is_mounted() {
            return;
        }
        let surface = self.stage.surface();
        let size = surface.size();
        let color = &BALLOON_COLORS[self.stage.random_index(BALLOON_COLORS.len())];
        let x = size.width * self.stage.random_range(0.05, 0.85);
        let element = surface.append(
            Some(self.field),
            ElementSpec::new("balloon")
                .color(color.css)
                .at(Vec2::new(x, size.height))
                .sized(BALLOON_SIZE),
        );
        let balloon = Rc::new(Balloon {
            element,
            color,
            speed: self.stage.random_range(MIN_SPEED, MAX_SPEED),
            popped: Cell::new(false),
            frame: Cell::new(None),
            listener: Cell::new(None),
        });

        let weak = Rc::downgrade(self);
        let tapped = Rc::clone(&balloon);
        let listener = self.stage.scope().listen(
            EventTarget::Element(element),
            EventKind::PointerDown,
            ListenOptions::default(),
            move |_| {
                if let Some(sky) = weak.upgrade() {
                    sky.pop(&tapped);
                }
            },
        );
        balloon.listener.set(Some(listener));

        self.balloons.borrow_mut().push(Rc::clone(&balloon));
        self.animate(balloon);
    }

    fn animate(self: &Rc<Self>, balloon: Rc<Balloon>) {
        let weak = Rc::downgrade(self);
        let rising = Rc::clone(&balloon);
        let handle = self.stage.scope().schedule_frame(move |_| {
            if let Some(sky) = weak.upgrade() {
                sky.rise(rising);
            }
        });
        balloon.frame.set(Some(handle));
    }

    fn rise(self: &Rc<Self>, balloon: Rc<Balloon>) {
        if balloon.popped.get() || !self.stage.is_mounted() {
            return;
        }
        let surface = self.stage.surface();
        let Some(rect) = surface.bounds(balloon.element) else {
            return;
        };
        let y = rect.y - balloon.speed;
        if y + rect.height < -ESCAPE_MARGIN {
            balloon.popped.set(true);
            self.forget(&balloon);
            surface.remove(balloon.element);
            return;
        }
        surface.set_position(balloon.element, Vec2::new(rect.x, y));
        self.animate(balloon);
    }

    fn pop(&self, balloon: &Balloon) {
        if !self.stage.is_mounted() || balloon.popped.replace(true) {
            return;
        }
        let services = self.stage.services();
        services.audio.play_cue(Cue::Pop);
        services.voice.speak(balloon.color.name_fr);

        let surface = self.stage.surface();
        if let Some(rect) = surface.bounds(balloon.element) {
            let center = rect.center();
            services.effects.burst(center.x, center.y, POP_BURST);
        }
        surface.set_class(balloon.element, "popping", true);
        self.popped.set(self.popped.get() + 1);
        self.forget(balloon);

        let element = balloon.element;
        let stage = self.stage.clone();
        self.stage.scope().schedule_once(POP_REMOVE_MS, move || {
            if stage.is_mounted() {
                stage.surface().remove(element);
            }
        });
    }

    /// Stop tracking `balloon` and cancel its frame loop and tap listener
    fn forget(&self, balloon: &Balloon) {
        let scope = self.stage.scope();
        for handle in [balloon.frame.take(), balloon.listener.take()].into_iter().flatten() {
            scope.cancel(handle);
        }
        self.balloons.borrow_mut().retain(|b| b.element != balloon.element);
    }
}
