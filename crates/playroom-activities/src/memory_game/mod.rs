//! Memory Game
//!
//! Face-down cards hide pairs of pictures. Two flipped cards stay up and
//! score when they match, or flip back with a small penalty when they do
//! not. Three levels of two, three and four pairs, then a celebration and a
//! fresh start.

use std::cell::RefCell;
use std::rc::Rc;

use playroom_core::scope::Handle;
use playroom_core::{
    Activity, ActivityContext, ActivityError, ActivityManifest, Cue, ElementId, ElementSpec,
    EventKind, EventTarget, Lifecycle, ListenOptions, Size, Stage, Vec2,
};
use tracing::{debug, info};

use crate::catalog::{CardFace, CARD_FACES};
use crate::layout::{grid, level_text, require_size, score_text};
use crate::manifest::MEMORY_GAME_MANIFEST;

/// Points per found pair
pub const PAIR_POINTS: u32 = 50;

/// Points lost per wrong guess; the score never goes below zero
pub const MISS_PENALTY: u32 = 5;

/// Delay before a found pair is scored (ms)
pub const MATCH_DELAY_MS: u32 = 500;

/// Delay before a wrong guess flips back (ms)
pub const MISMATCH_DELAY_MS: u32 = 1000;

/// Delay between the last pair and the level summary (ms)
pub const COMPLETE_DELAY_MS: u32 = 1000;

/// Delay between the level summary and the next level (ms)
pub const NEXT_LEVEL_MS: u32 = 3000;

/// Delay between the final celebration and the restart (ms)
pub const RESTART_MS: u32 = 5000;

/// Pairs and columns per level; every level has two rows
pub const LEVELS: [(usize, usize); 3] = [(2, 2), (3, 3), (4, 4)];

const PAIR_BURST: u32 = 20;
const LEVEL_BURST: u32 = 50;
const FINAL_BURST: u32 = 40;
const FINAL_BURSTS: u32 = 5;
const FINAL_BURST_SPACING_MS: u32 = 300;

const ROWS: usize = 2;
const CARD_SIZE: Size = Size::new(120.0, 140.0);
const GRID_TOP: f32 = 120.0;
const ROW_GAP: f32 = 20.0;
const MIN_SURFACE: Size = Size::new(600.0, 460.0);

/// Find the pairs
pub struct MemoryGame {
    lifecycle: Lifecycle,
    table: Option<Rc<Table>>,
}

struct Table {
    stage: Stage,
    score_label: ElementId,
    level_label: ElementId,
    banner: ElementId,
    area: ElementId,
    state: RefCell<TableState>,
}

#[derive(Default)]
struct TableState {
    level: u32,
    score: u32,
    pairs_found: usize,
    can_flip: bool,
    cards: Vec<Card>,
    flipped: Vec<usize>,
    overlay: Option<ElementId>,
}

struct Card {
    element: ElementId,
    face: &'static CardFace,
    flipped: bool,
    matched: bool,
    listener: Handle,
}

impl MemoryGame {
    pub fn new(context: ActivityContext) -> Self {
        Self {
            lifecycle: Lifecycle::new(context, MEMORY_GAME_MANIFEST.id),
            table: None,
        }
    }

    pub fn level(&self) -> u32 {
        self.table.as_ref().map_or(0, |t| t.state.borrow().level)
    }

    pub fn score(&self) -> u32 {
        self.table.as_ref().map_or(0, |t| t.state.borrow().score)
    }

    pub fn pairs_found(&self) -> usize {
        self.table.as_ref().map_or(0, |t| t.state.borrow().pairs_found)
    }

    /// Card elements with their picture kind, in grid order
    pub fn cards(&self) -> Vec<(ElementId, &'static str)> {
        self.table
            .as_ref()
            .map(|t| {
                t.state
                    .borrow()
                    .cards
                    .iter()
                    .map(|c| (c.element, c.face.kind))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn banner(&self) -> Option<ElementId> {
        self.table.as_ref().map(|t| t.banner)
    }
}

impl Activity for MemoryGame {
    fn manifest(&self) -> &'static ActivityManifest {
        &MEMORY_GAME_MANIFEST
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
            ElementSpec::new("memory-grid")
                .at(Vec2::new(0.0, GRID_TOP))
                .sized(Size::new(size.width, size.height - GRID_TOP)),
        );

        let table = Rc::new(Table {
            stage: stage.clone(),
            score_label,
            level_label,
            banner,
            area,
            state: RefCell::new(TableState::default()),
        });
        table.deal(1);
        self.table = Some(table);
        Ok(())
    }

    fn teardown(&mut self) {
        self.table = None;
    }
}

impl Table {
    /// Run `f` after `delay_ms` if the table is still alive and mounted
    fn later(self: &Rc<Self>, delay_ms: u32, f: impl FnOnce(&Rc<Table>) + 'static) {
        let weak = Rc::downgrade(self);
        self.stage.scope().schedule_once(delay_ms, move || {
            if let Some(table) = weak.upgrade() {
                if table.stage.is_mounted() {
                    f(&table);
                }
            }
        });
    }

    fn deal(self: &Rc<Self>, level: u32) {
        let surface = self.stage.surface();
        let scope = self.stage.scope();
        let (pairs, columns) = LEVELS[(level as usize - 1).min(LEVELS.len() - 1)];

        let (old_cards, overlay, score) = {
            let mut state = self.state.borrow_mut();
            state.level = level;
            state.pairs_found = 0;
            state.flipped.clear();
            state.can_flip = true;
            (std::mem::take(&mut state.cards), state.overlay.take(), state.score)
        };
        for card in old_cards {
            scope.cancel(card.listener);
            surface.remove(card.element);
        }
        if let Some(overlay) = overlay {
            surface.remove(overlay);
        }
        surface.set_class(self.banner, "show", false);
        surface.set_text(self.banner, "Niveau suivant!");
        surface.set_text(self.level_label, &level_text(level));
        surface.set_text(self.score_label, &score_text(score));

        let mut faces: Vec<&'static CardFace> = CARD_FACES.iter().collect();
        self.stage.shuffle(&mut faces);
        faces.truncate(pairs);
        let mut deck: Vec<&'static CardFace> = faces.iter().flat_map(|f| [*f, *f]).collect();
        self.stage.shuffle(&mut deck);

        let cells = grid(columns, ROWS, CARD_SIZE, ROW_GAP, surface.size().width, GRID_TOP);
        let mut cards = Vec::with_capacity(pairs * 2);
        for (index, (face, position)) in deck.into_iter().zip(cells).enumerate() {
            let element = surface.append(
                Some(self.area),
                ElementSpec::new("memory-card").at(position).sized(CARD_SIZE),
            );
            let inner = surface.append(Some(element), ElementSpec::new("memory-card-inner").at(position));
            surface.append(Some(inner), ElementSpec::new("memory-card-front").text("❓").at(position));
            surface.append(Some(inner), ElementSpec::new("memory-card-back").text(face.emoji).at(position));

            let weak = Rc::downgrade(self);
            let listener = scope.listen(
                EventTarget::Element(element),
                EventKind::PointerDown,
                ListenOptions::default(),
                move |_| {
                    if let Some(table) = weak.upgrade() {
                        table.flip(index);
                    }
                },
            );
            cards.push(Card {
                element,
                face,
                flipped: false,
                matched: false,
                listener,
            });
        }
        self.state.borrow_mut().cards = cards;

        self.stage.services().audio.play_cue(Cue::Pop);
        info!(activity = MEMORY_GAME_MANIFEST.id, level, pairs, "cards dealt");
    }

    fn flip(self: &Rc<Self>, index: usize) {
        if !self.stage.is_mounted() {
            return;
        }
        let (element, pair) = {
            let mut state = self.state.borrow_mut();
            if !state.can_flip {
                return;
            }
            let Some(card) = state.cards.get_mut(index) else {
                return;
            };
            if card.flipped || card.matched {
                return;
            }
            card.flipped = true;
            let element = card.element;
            state.flipped.push(index);
            let pair = if state.flipped.len() == 2 {
                state.can_flip = false;
                Some((state.flipped[0], state.flipped[1]))
            } else {
                None
            };
            (element, pair)
        };
        self.stage.surface().set_class(element, "flipped", true);
        self.stage.services().audio.play_cue(Cue::Pop);

        let Some((first, second)) = pair else {
            return;
        };
        let same = {
            let state = self.state.borrow();
            state.cards[first].face.kind == state.cards[second].face.kind
        };
        if same {
            self.later(MATCH_DELAY_MS, move |table| table.matched(first, second));
        } else {
            self.later(MISMATCH_DELAY_MS, move |table| table.mismatched(first, second));
        }
    }

    fn matched(self: &Rc<Self>, first: usize, second: usize) {
        let surface = self.stage.surface();
        let services = self.stage.services();
        let (face, elements, score, done) = {
            let mut state = self.state.borrow_mut();
            for index in [first, second] {
                state.cards[index].matched = true;
            }
            state.pairs_found += 1;
            state.score += PAIR_POINTS;
            state.flipped.clear();
            state.can_flip = true;
            let done = state.pairs_found == state.cards.len() / 2;
            (
                state.cards[first].face,
                [state.cards[first].element, state.cards[second].element],
                state.score,
                done,
            )
        };

        surface.set_text(self.score_label, &score_text(score));
        services.voice.speak(&format!("{} ! Une paire !", face.name_fr));
        services.audio.play_cue(Cue::Success);
        for element in elements {
            surface.set_class(element, "matched", true);
            if let Some(rect) = surface.bounds(element) {
                let center = rect.center();
                services.effects.burst(center.x, center.y, PAIR_BURST);
            }
        }
        debug!(activity = MEMORY_GAME_MANIFEST.id, kind = face.kind, score, "pair found");

        if done {
            self.later(COMPLETE_DELAY_MS, |table| table.level_complete());
        }
    }

    fn mismatched(self: &Rc<Self>, first: usize, second: usize) {
        let surface = self.stage.surface();
        let (elements, score) = {
            let mut state = self.state.borrow_mut();
            state.score = state.score.saturating_sub(MISS_PENALTY);
            for index in [first, second] {
                state.cards[index].flipped = false;
            }
            state.flipped.clear();
            state.can_flip = true;
            (
                [state.cards[first].element, state.cards[second].element],
                state.score,
            )
        };
        surface.set_text(self.score_label, &score_text(score));
        self.stage.services().audio.play_cue(Cue::Thud);
        for element in elements {
            surface.set_class(element, "flipped", false);
        }
    }

    fn level_complete(self: &Rc<Self>) {
        let (level, score) = {
            let state = self.state.borrow();
            (state.level, state.score)
        };
        let surface = self.stage.surface();
        let services = self.stage.services();
        services.voice.speak(&format!("Niveau {level} terminé !"));
        surface.set_text(self.banner, &format!("Level {level} Complete!\nScore: {score}"));
        surface.set_class(self.banner, "show", true);
        services.audio.play_cue(Cue::Success);
        let center = surface.size().half();
        services.effects.burst(center.x, center.y, LEVEL_BURST);

        self.later(NEXT_LEVEL_MS, move |table| {
            if (level as usize) < LEVELS.len() {
                table.deal(level + 1);
            } else {
                table.celebrate();
            }
        });
    }

    fn celebrate(self: &Rc<Self>) {
        let surface = self.stage.surface();
        let score = self.state.borrow().score;

        let overlay = surface.append(None, ElementSpec::new("completion-celebration"));
        surface.append(Some(overlay), ElementSpec::new("celebration-emoji").text("🎉"));
        surface.append(Some(overlay), ElementSpec::new("celebration-text").text("Tu as gagné !"));
        surface.append(
            Some(overlay),
            ElementSpec::new("celebration-score").text(format!("Score final : {score}")),
        );
        self.state.borrow_mut().overlay = Some(overlay);

        self.stage
            .services()
            .voice
            .speak(&format!("Tu as gagné ! Score final : {score} points !"));
        for i in 0..FINAL_BURSTS {
            self.later(i * FINAL_BURST_SPACING_MS, |table| {
                let size = table.stage.surface().size();
                let x = size.width * table.stage.random_range(0.0, 1.0);
                let y = size.height * table.stage.random_range(0.0, 1.0);
                table.stage.services().effects.burst(x, y, FINAL_BURST);
            });
        }
        self.later(RESTART_MS, |table| {
            table.state.borrow_mut().score = 0;
            table.deal(1);
        });
        info!(activity = MEMORY_GAME_MANIFEST.id, score, "all pairs found");
    }
}
