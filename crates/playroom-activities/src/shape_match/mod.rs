//! Shape Match
//!
//! Shapes are dragged onto the outline of the same shape. Level N shows the
//! first N shapes, each outline taking one shape. Completing the fourth
//! level shows a trophy and starts over from level 1 with the score kept.

use std::cell::RefCell;
use std::rc::Rc;

use playroom_core::{
    Activity, ActivityContext, ActivityError, ActivityManifest, Cue, DragController, DragReport,
    DropOutcome, ElementId, ElementSpec, Lifecycle, Size, Stage, Vec2,
};
use tracing::{debug, info};

use crate::catalog::{Shape, PRAISE, SHAPES};
use crate::layout::{level_text, require_size, score_text, spread};
use crate::manifest::SHAPE_MATCH_MANIFEST;

/// Level N shows N shapes
pub const FINAL_LEVEL: u32 = 4;

/// Points per placed shape
pub const MATCH_POINTS: u32 = 20;

/// Delay between a placement and the level completion check (ms)
pub const CHECK_DELAY_MS: u32 = 500;

/// How long a refused shape keeps its bounce (ms)
pub const BOUNCE_MS: u32 = 400;

/// Delay between "Bravo!" and the next level (ms)
pub const NEXT_LEVEL_MS: u32 = 2500;

/// Delay between the trophy and the restart (ms)
pub const RESTART_MS: u32 = 4000;

const MATCH_BURST: u32 = 30;
const LEVEL_BURST: u32 = 50;
const FINAL_BURST: u32 = 40;
const FINAL_BURSTS: u32 = 5;
const FINAL_BURST_SPACING_MS: u32 = 300;

const SLOT_SIZE: Size = Size::new(120.0, 120.0);
const SLOT_TOP: f32 = 140.0;
const SHAPE_SIZE: Size = Size::new(90.0, 90.0);
const SHAPE_BOTTOM_MARGIN: f32 = 150.0;
const MIN_SURFACE: Size = Size::new(600.0, 480.0);

type Slotter = DragController<&'static str, &'static str>;

/// Drag shapes into their outlines
pub struct ShapeMatch {
    lifecycle: Lifecycle,
    board: Option<Rc<Board>>,
}

struct Board {
    stage: Stage,
    drag: Slotter,
    score_label: ElementId,
    level_label: ElementId,
    banner: ElementId,
    area: ElementId,
    state: RefCell<BoardState>,
}

#[derive(Default)]
struct BoardState {
    level: u32,
    score: u32,
    matched: u32,
    transitioning: bool,
    elements: Vec<ElementId>,
    slots: Vec<(ElementId, &'static Shape)>,
    pieces: Vec<(ElementId, &'static Shape)>,
    overlay: Option<ElementId>,
}

impl ShapeMatch {
    pub fn new(context: ActivityContext) -> Self {
        Self {
            lifecycle: Lifecycle::new(context, SHAPE_MATCH_MANIFEST.id),
            board: None,
        }
    }

    /// Current level, 0 when not mounted
    pub fn level(&self) -> u32 {
        self.board.as_ref().map_or(0, |b| b.state.borrow().level)
    }

    pub fn score(&self) -> u32 {
        self.board.as_ref().map_or(0, |b| b.state.borrow().score)
    }

    /// Outlines of the current level with their shape key
    pub fn slots(&self) -> Vec<(ElementId, &'static str)> {
        self.board
            .as_ref()
            .map(|b| b.state.borrow().slots.iter().map(|(id, s)| (*id, s.key)).collect())
            .unwrap_or_default()
    }

    /// Draggable shapes of the current level with their shape key
    pub fn pieces(&self) -> Vec<(ElementId, &'static str)> {
        self.board
            .as_ref()
            .map(|b| b.state.borrow().pieces.iter().map(|(id, s)| (*id, s.key)).collect())
            .unwrap_or_default()
    }

    pub fn banner(&self) -> Option<ElementId> {
        self.board.as_ref().map(|b| b.banner)
    }

    pub fn level_label(&self) -> Option<ElementId> {
        self.board.as_ref().map(|b| b.level_label)
    }
}

impl Activity for ShapeMatch {
    fn manifest(&self) -> &'static ActivityManifest {
        &SHAPE_MATCH_MANIFEST
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
        let banner = surface.append(
            None,
            ElementSpec::new("level-complete-message").text("Niveau suivant!"),
        );
        let area = surface.append(
            None,
            ElementSpec::new("shape-game-container")
                .at(Vec2::new(0.0, SLOT_TOP))
                .sized(Size::new(size.width, size.height - SLOT_TOP)),
        );

        // Wrong outlines and empty space both send the shape straight back
        let drag: Slotter = DragController::attach(stage, stage.config().drag.with_mismatch_return(0));
        let board = Rc::new(Board {
            stage: stage.clone(),
            drag,
            score_label,
            level_label,
            banner,
            area,
            state: RefCell::new(BoardState::default()),
        });

        let weak = Rc::downgrade(&board);
        board.drag.on_resolve(move |report| {
            if let Some(board) = weak.upgrade() {
                board.resolved(report);
            }
        });
        let weak = Rc::downgrade(&board);
        board.drag.on_pick_up(move |_, key| {
            if let Some(board) = weak.upgrade() {
                board.lifted(key);
            }
        });
        board.setup_level(1);
        self.board = Some(board);
        Ok(())
    }

    fn teardown(&mut self) {
        self.board = None;
    }
}

fn shape(key: &str) -> Option<&'static Shape> {
    SHAPES.iter().find(|s| s.key == key)
}

impl Board {
    /// Run `f` after `delay_ms` if the board is still alive and mounted
    fn later(self: &Rc<Self>, delay_ms: u32, f: impl FnOnce(&Rc<Board>) + 'static) {
        let weak = Rc::downgrade(self);
        self.stage.scope().schedule_once(delay_ms, move || {
            if let Some(board) = weak.upgrade() {
                if board.stage.is_mounted() {
                    f(&board);
                }
            }
        });
    }

    fn setup_level(self: &Rc<Self>, level: u32) {
        let surface = self.stage.surface();
        let size = surface.size();
        self.drag.reset();

        let (old_elements, overlay) = {
            let mut state = self.state.borrow_mut();
            state.slots.clear();
            state.pieces.clear();
            state.level = level;
            state.matched = 0;
            state.transitioning = false;
            (std::mem::take(&mut state.elements), state.overlay.take())
        };
        for element in old_elements.into_iter().chain(overlay) {
            surface.remove(element);
        }
        surface.set_class(self.banner, "show", false);
        surface.set_text(self.banner, "Niveau suivant!");
        surface.set_text(self.level_label, &level_text(level));

        let shapes = &SHAPES[..level as usize];
        let mut elements = Vec::with_capacity(shapes.len() * 2);
        let mut slots = Vec::with_capacity(shapes.len());
        let mut pieces = Vec::with_capacity(shapes.len());
        for (shape, x) in shapes
            .iter()
            .zip(spread(shapes.len(), SLOT_SIZE.width, size.width))
        {
            let slot = surface.append(
                Some(self.area),
                ElementSpec::new("shape-target")
                    .at(Vec2::new(x, SLOT_TOP))
                    .sized(SLOT_SIZE),
            );
            surface.append(
                Some(slot),
                ElementSpec::new("shape-outline")
                    .text(shape.emoji)
                    .at(Vec2::new(x, SLOT_TOP)),
            );
            self.drag
                .add_single_use_target_element(shape.key, slot, |item, key| item == key);
            elements.push(slot);
            slots.push((slot, shape));
        }

        let mut shuffled: Vec<&'static Shape> = shapes.iter().collect();
        self.stage.shuffle(&mut shuffled);
        let piece_top = size.height - SHAPE_BOTTOM_MARGIN;
        for (&shape, x) in shuffled
            .iter()
            .zip(spread(shuffled.len(), SHAPE_SIZE.width, size.width))
        {
            let piece = surface.append(
                Some(self.area),
                ElementSpec::new("draggable-shape")
                    .text(shape.emoji)
                    .color(shape.css)
                    .at(Vec2::new(x, piece_top))
                    .sized(SHAPE_SIZE),
            );
            self.drag.add_draggable(piece, shape.key);
            elements.push(piece);
            pieces.push((piece, shape));
        }
        {
            let mut state = self.state.borrow_mut();
            state.elements = elements;
            state.slots = slots;
            state.pieces = pieces;
        }

        self.stage.services().audio.play_cue(Cue::Pop);
        info!(activity = SHAPE_MATCH_MANIFEST.id, level, "level started");
    }

    fn lifted(&self, key: &str) {
        let services = self.stage.services();
        if let Some(shape) = shape(key) {
            services.voice.speak(shape.name_fr);
        }
        services.audio.play_cue(Cue::Pop);
    }

    fn resolved(self: &Rc<Self>, report: &DragReport<&'static str, &'static str>) {
        match report.outcome {
            DropOutcome::Match(key) => self.placed(key),
            DropOutcome::Mismatch(_) | DropOutcome::Miss => self.refused(report.element),
        }
    }

    fn placed(self: &Rc<Self>, key: &'static str) {
        let slot = self
            .state
            .borrow()
            .slots
            .iter()
            .find(|(_, s)| s.key == key)
            .map(|(id, _)| *id);
        let Some(slot) = slot else {
            return;
        };
        let surface = self.stage.surface();
        let services = self.stage.services();

        let score = {
            let mut state = self.state.borrow_mut();
            state.score += MATCH_POINTS;
            state.matched += 1;
            state.score
        };
        surface.set_class(slot, "filled", true);
        surface.set_text(self.score_label, &score_text(score));
        services
            .voice
            .speak(PRAISE[self.stage.random_index(PRAISE.len())]);
        services.audio.play_cue(Cue::Success);
        if let Some(rect) = surface.bounds(slot) {
            let center = rect.center();
            services.effects.burst(center.x, center.y, MATCH_BURST);
        }
        self.later(CHECK_DELAY_MS, |board| board.check_complete());
        debug!(activity = SHAPE_MATCH_MANIFEST.id, shape = key, score, "shape placed");
    }

    fn refused(self: &Rc<Self>, piece: ElementId) {
        self.stage.services().audio.play_cue(Cue::Thud);
        self.stage.surface().set_class(piece, "bounce-back", true);
        self.later(BOUNCE_MS, move |board| {
            board.stage.surface().set_class(piece, "bounce-back", false);
        });
    }

    fn check_complete(self: &Rc<Self>) {
        let level = {
            let mut state = self.state.borrow_mut();
            if state.transitioning || state.matched < state.level {
                return;
            }
            state.transitioning = true;
            state.level
        };

        let surface = self.stage.surface();
        let services = self.stage.services();
        services.voice.speak("Niveau terminé !");
        surface.set_text(self.banner, "Bravo!");
        surface.set_class(self.banner, "show", true);
        services.audio.play_cue(Cue::Success);
        let center = surface.size().half();
        services.effects.burst(center.x, center.y, LEVEL_BURST);

        self.later(NEXT_LEVEL_MS, move |board| {
            if level < FINAL_LEVEL {
                board.setup_level(level + 1);
            } else {
                board.celebrate();
            }
        });
    }

    fn celebrate(self: &Rc<Self>) {
        let surface = self.stage.surface();
        let score = self.state.borrow().score;

        let overlay = surface.append(None, ElementSpec::new("completion-celebration"));
        surface.append(Some(overlay), ElementSpec::new("celebration-emoji").text("🏆"));
        surface.append(
            Some(overlay),
            ElementSpec::new("celebration-text").text("Tu as terminé tous les niveaux !"),
        );
        surface.append(
            Some(overlay),
            ElementSpec::new("celebration-score").text(format!("Score final : {score}")),
        );
        self.state.borrow_mut().overlay = Some(overlay);

        self.stage.services().voice.speak(&format!(
            "Tu as terminé tous les niveaux ! Score final : {score} points !"
        ));
        for i in 0..FINAL_BURSTS {
            self.later(i * FINAL_BURST_SPACING_MS, |board| {
                let size = board.stage.surface().size();
                let x = size.width * board.stage.random_range(0.0, 1.0);
                let y = size.height * board.stage.random_range(0.0, 1.0);
                board.stage.services().effects.burst(x, y, FINAL_BURST);
            });
        }
        self.later(RESTART_MS, |board| board.setup_level(1));
        info!(activity = SHAPE_MATCH_MANIFEST.id, score, "all shapes placed");
    }
}
