//! Color Sorter
//!
//! Colored balls appear at the bottom of the surface and are dragged into
//! the bucket of the same color. Buckets are reusable targets.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use playroom_core::{
    Activity, ActivityContext, ActivityError, ActivityManifest, Cue, DragController, DragReport,
    DropOutcome, ElementId, ElementSpec, Lifecycle, Size, Stage, Vec2,
};
use tracing::debug;

use crate::catalog::{sort_color, SortColor, SORT_COLORS};
use crate::layout::{require_size, score_text, spread};
use crate::manifest::COLOR_SORTER_MANIFEST;

/// Delay between two spawn attempts (ms)
pub const SPAWN_INTERVAL_MS: u32 = 2000;

/// No ball spawns while this many are waiting
pub const MAX_BALLS: usize = 5;

/// Points per sorted ball
pub const MATCH_POINTS: u32 = 10;

/// Particles per sorted ball
pub const MATCH_BURST: u32 = 30;

/// Delay between a sort and the removal of the ball (ms)
pub const SORTED_REMOVE_MS: u32 = 200;

const BUCKET_SIZE: Size = Size::new(120.0, 120.0);
const BUCKET_TOP: f32 = 100.0;
const BALL_SIZE: Size = Size::new(60.0, 60.0);
const BALL_BOTTOM_MARGIN: f32 = 120.0;
const MIN_SURFACE: Size = Size::new(400.0, 400.0);

type Sorter = DragController<&'static str, &'static str>;

/// Drag balls into the bucket of their color
pub struct ColorSorter {
    lifecycle: Lifecycle,
    board: Option<Rc<Board>>,
}

struct Board {
    stage: Stage,
    drag: Sorter,
    score_label: ElementId,
    buckets: Vec<(ElementId, &'static SortColor)>,
    balls: RefCell<Vec<(ElementId, &'static str)>>,
    score: Cell<u32>,
}

impl ColorSorter {
    pub fn new(context: ActivityContext) -> Self {
        Self {
            lifecycle: Lifecycle::new(context, COLOR_SORTER_MANIFEST.id),
            board: None,
        }
    }

    pub fn score(&self) -> u32 {
        self.board.as_ref().map_or(0, |b| b.score.get())
    }

    /// Balls waiting to be sorted with their color key, oldest first
    pub fn balls(&self) -> Vec<(ElementId, &'static str)> {
        self.board
            .as_ref()
            .map(|b| b.balls.borrow().clone())
            .unwrap_or_default()
    }

    /// Bucket element for a color key
    pub fn bucket(&self, key: &str) -> Option<ElementId> {
        self.board.as_ref().and_then(|b| {
            b.buckets
                .iter()
                .find(|(_, color)| color.key == key)
                .map(|(id, _)| *id)
        })
    }
}

impl Activity for ColorSorter {
    fn manifest(&self) -> &'static ActivityManifest {
        &COLOR_SORTER_MANIFEST
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

        let score_label = surface.append(
            None,
            ElementSpec::new("sorter-score")
                .text(score_text(0))
                .at(Vec2::new(20.0, 20.0)),
        );
        surface.append(
            None,
            ElementSpec::new("sorter-instruction").text("🗑️ Trie les balles par couleur!"),
        );

        let drag: Sorter = DragController::attach(stage, stage.config().drag.clone());
        let mut buckets = Vec::with_capacity(SORT_COLORS.len());
        for (color, x) in SORT_COLORS
            .iter()
            .zip(spread(SORT_COLORS.len(), BUCKET_SIZE.width, size.width))
        {
            let position = Vec2::new(x, BUCKET_TOP);
            let bucket = surface.append(
                None,
                ElementSpec::new("sorter-bucket")
                    .color(color.css)
                    .at(position)
                    .sized(BUCKET_SIZE),
            );
            surface.append(
                Some(bucket),
                ElementSpec::new("sorter-bucket-label")
                    .text(color.name_fr)
                    .at(position),
            );
            drag.add_target_element(color.key, bucket, |item, key| item == key);
            buckets.push((bucket, color));
        }

        let board = Rc::new(Board {
            stage: stage.clone(),
            drag,
            score_label,
            buckets,
            balls: RefCell::new(Vec::new()),
            score: Cell::new(0),
        });

        let weak = Rc::downgrade(&board);
        board.drag.on_resolve(move |report| {
            if let Some(board) = weak.upgrade() {
                board.resolved(report);
            }
        });

        board.spawn();
        let weak = Rc::downgrade(&board);
        stage.scope().schedule_periodic(SPAWN_INTERVAL_MS, move || {
            if let Some(board) = weak.upgrade() {
                board.spawn();
            }
        });
        self.board = Some(board);

        stage.services().audio.play_cue(Cue::Pop);
        stage.services().voice.speak("Trie les balles par couleur!");
        Ok(())
    }

    fn teardown(&mut self) {
        self.board = None;
    }
}

impl Board {
    fn spawn(self: &Rc<Self>) {
        if !self.stage.is_mounted() || self.balls.borrow().len() >= MAX_BALLS {
            return;
        }
        let surface = self.stage.surface();
        let size = surface.size();
        let color = &SORT_COLORS[self.stage.random_index(SORT_COLORS.len())];
        let x = size.width * self.stage.random_range(0.1, 0.9) - BALL_SIZE.width / 2.0;
        let ball = surface.append(
            None,
            ElementSpec::new("sorter-ball")
                .text(color.emoji)
                .color(color.css)
                .at(Vec2::new(x.max(0.0), size.height - BALL_BOTTOM_MARGIN))
                .sized(BALL_SIZE),
        );
        self.drag.add_draggable(ball, color.key);
        self.balls.borrow_mut().push((ball, color.key));
        debug!(activity = COLOR_SORTER_MANIFEST.id, color = color.key, "ball spawned");
    }

    fn resolved(self: &Rc<Self>, report: &DragReport<&'static str, &'static str>) {
        match report.outcome {
            DropOutcome::Match(key) => self.sorted(report.element, key),
            DropOutcome::Mismatch(_) => self.rejected(report.element),
            DropOutcome::Miss => {}
        }
    }

    fn sorted(self: &Rc<Self>, ball: ElementId, key: &'static str) {
        let score = self.score.get() + MATCH_POINTS;
        self.score.set(score);
        let surface = self.stage.surface();
        surface.set_text(self.score_label, &score_text(score));

        let services = self.stage.services();
        services.audio.play_cue(Cue::Success);
        if let Some(color) = sort_color(key) {
            services.voice.speak(color.name_fr);
        }
        let bucket = self
            .buckets
            .iter()
            .find(|(_, color)| color.key == key)
            .and_then(|(id, _)| surface.bounds(*id));
        if let Some(rect) = bucket {
            let center = rect.center();
            services.effects.burst(center.x, center.y, MATCH_BURST);
        }
        surface.set_class(ball, "sorted", true);

        let weak = Rc::downgrade(self);
        self.stage.scope().schedule_once(SORTED_REMOVE_MS, move || {
            let Some(board) = weak.upgrade() else {
                return;
            };
            if !board.stage.is_mounted() {
                return;
            }
            board.drag.remove_draggable(ball);
            board.stage.surface().remove(ball);
            board.balls.borrow_mut().retain(|(b, _)| *b != ball);
        });
    }

    fn rejected(&self, ball: ElementId) {
        self.stage.services().audio.play_cue(Cue::Thud);
        self.stage.surface().set_class(ball, "shake", true);
        let stage = self.stage.clone();
        self.stage
            .scope()
            .schedule_once(self.stage.config().drag.mismatch_return_ms, move || {
                if stage.is_mounted() {
                    stage.surface().set_class(ball, "shake", false);
                }
            });
    }
}
