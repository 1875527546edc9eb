//! Hungry Animals
//!
//! Each level shows some animals and their foods in shuffled order. Dragging
//! a food onto the animal that eats it feeds the animal; every animal takes
//! one meal. Feeding all animals advances the level, and the last level ends
//! with a celebration before the game starts over.

use std::cell::RefCell;
use std::rc::Rc;

use playroom_core::{
    Activity, ActivityContext, ActivityError, ActivityManifest, Cue, DragController, DragReport,
    DropOutcome, ElementId, ElementSpec, Lifecycle, Size, Stage, Vec2,
};
use tracing::{debug, info};

use crate::catalog::{AnimalPair, ANIMAL_PAIRS};
use crate::layout::{require_size, score_text, spread};
use crate::manifest::HUNGRY_ANIMALS_MANIFEST;

/// Level N shows N animals
pub const FINAL_LEVEL: u32 = 3;

/// Points per fed animal
pub const MATCH_POINTS: u32 = 20;

/// Delay before a refused food slides back (ms)
pub const MISMATCH_RETURN_MS: u32 = 600;

/// Delay between a meal and the level completion check (ms)
pub const CHECK_DELAY_MS: u32 = 2000;

/// Delay between "Level Complete!" and the next level (ms)
pub const NEXT_LEVEL_MS: u32 = 2500;

/// Delay between the final celebration and the restart (ms)
pub const RESTART_MS: u32 = 4000;

/// Eaten food starts fading after this long (ms)
pub const FOOD_FADE_MS: u32 = 1500;

/// Faded food is removed after this long (ms)
pub const FOOD_REMOVE_MS: u32 = 300;

const MATCH_BURST: u32 = 30;
const LEVEL_BURST: u32 = 50;
const FINAL_BURST: u32 = 40;
const FINAL_BURSTS: u32 = 5;
const FINAL_BURST_SPACING_MS: u32 = 300;

const HEARTS: u32 = 3;
const HEART_SPACING_MS: u32 = 200;
const HEART_LIFETIME_MS: u32 = 1500;

const ANIMAL_SIZE: Size = Size::new(140.0, 160.0);
const ANIMAL_TOP: f32 = 120.0;
const FOOD_SIZE: Size = Size::new(80.0, 80.0);
const FOOD_BOTTOM_MARGIN: f32 = 140.0;
const MIN_SURFACE: Size = Size::new(540.0, 480.0);

type Feeder = DragController<&'static str, &'static str>;

/// Feed each animal the food it eats
pub struct HungryAnimals {
    lifecycle: Lifecycle,
    round: Option<Rc<Round>>,
}

struct Round {
    stage: Stage,
    drag: Feeder,
    score_label: ElementId,
    banner: ElementId,
    animal_area: ElementId,
    food_area: ElementId,
    state: RefCell<RoundState>,
}

#[derive(Default)]
struct RoundState {
    level: u32,
    score: u32,
    matches: u32,
    completed: bool,
    animals: Vec<Animal>,
    foods: Vec<(ElementId, &'static AnimalPair)>,
    overlay: Option<ElementId>,
}

struct Animal {
    container: ElementId,
    face: ElementId,
    pair: &'static AnimalPair,
}

impl HungryAnimals {
    pub fn new(context: ActivityContext) -> Self {
        Self {
            lifecycle: Lifecycle::new(context, HUNGRY_ANIMALS_MANIFEST.id),
            round: None,
        }
    }

    /// Current level, 0 when not mounted
    pub fn level(&self) -> u32 {
        self.round.as_ref().map_or(0, |r| r.state.borrow().level)
    }

    pub fn score(&self) -> u32 {
        self.round.as_ref().map_or(0, |r| r.state.borrow().score)
    }

    /// Animals fed on the current level
    pub fn matches(&self) -> u32 {
        self.round.as_ref().map_or(0, |r| r.state.borrow().matches)
    }

    /// Animal containers of the current level with their type
    pub fn animals(&self) -> Vec<(ElementId, &'static str)> {
        self.round
            .as_ref()
            .map(|r| {
                r.state
                    .borrow()
                    .animals
                    .iter()
                    .map(|a| (a.container, a.pair.animal_type))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Uneaten foods of the current level with the animal type they feed
    pub fn foods(&self) -> Vec<(ElementId, &'static str)> {
        self.round
            .as_ref()
            .map(|r| {
                r.state
                    .borrow()
                    .foods
                    .iter()
                    .map(|(id, pair)| (*id, pair.animal_type))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Head element of an animal container
    pub fn face(&self, container: ElementId) -> Option<ElementId> {
        let round = self.round.as_ref()?;
        let state = round.state.borrow();
        state
            .animals
            .iter()
            .find(|a| a.container == container)
            .map(|a| a.face)
    }

    pub fn banner(&self) -> Option<ElementId> {
        self.round.as_ref().map(|r| r.banner)
    }
}

impl Activity for HungryAnimals {
    fn manifest(&self) -> &'static ActivityManifest {
        &HUNGRY_ANIMALS_MANIFEST
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

        surface.append(
            None,
            ElementSpec::new("animals-instruction").text("🍽️ Nourris les animaux!"),
        );
        let score_label = surface.append(
            None,
            ElementSpec::new("animals-score")
                .text(score_text(0))
                .at(Vec2::new(20.0, 20.0)),
        );
        let animal_area = surface.append(
            None,
            ElementSpec::new("animals-area")
                .at(Vec2::new(0.0, ANIMAL_TOP))
                .sized(Size::new(size.width, ANIMAL_SIZE.height)),
        );
        let food_area = surface.append(
            None,
            ElementSpec::new("foods-area")
                .at(Vec2::new(0.0, size.height - FOOD_BOTTOM_MARGIN))
                .sized(Size::new(size.width, FOOD_SIZE.height)),
        );
        let banner = surface.append(None, ElementSpec::new("level-banner"));

        let drag: Feeder = DragController::attach(
            stage,
            stage.config().drag.with_mismatch_return(MISMATCH_RETURN_MS),
        );
        let round = Rc::new(Round {
            stage: stage.clone(),
            drag,
            score_label,
            banner,
            animal_area,
            food_area,
            state: RefCell::new(RoundState::default()),
        });

        let weak = Rc::downgrade(&round);
        round.drag.on_resolve(move |report| {
            if let Some(round) = weak.upgrade() {
                round.resolved(report);
            }
        });
        round.setup_level(1);
        self.round = Some(round);

        stage.services().audio.play_cue(Cue::Pop);
        stage.services().voice.speak("Nourris les animaux!");
        Ok(())
    }

    fn teardown(&mut self) {
        self.round = None;
    }
}

impl Round {
    /// Run `f` after `delay_ms` if the round is still alive and mounted
    fn later(self: &Rc<Self>, delay_ms: u32, f: impl FnOnce(&Rc<Round>) + 'static) {
        let weak = Rc::downgrade(self);
        self.stage.scope().schedule_once(delay_ms, move || {
            if let Some(round) = weak.upgrade() {
                if round.stage.is_mounted() {
                    f(&round);
                }
            }
        });
    }

    fn setup_level(self: &Rc<Self>, level: u32) {
        let surface = self.stage.surface();
        let size = surface.size();
        self.drag.reset();

        let mut state = self.state.borrow_mut();
        for animal in state.animals.drain(..) {
            surface.remove(animal.container);
        }
        for (food, _) in state.foods.drain(..) {
            surface.remove(food);
        }
        if let Some(overlay) = state.overlay.take() {
            surface.remove(overlay);
        }
        surface.set_class(self.banner, "show", false);
        state.level = level;
        state.matches = 0;
        state.completed = false;

        let mut pairs: Vec<&'static AnimalPair> = ANIMAL_PAIRS.iter().collect();
        self.stage.shuffle(&mut pairs);
        pairs.truncate(level as usize);
        let mut foods = pairs.clone();
        self.stage.shuffle(&mut foods);

        for (&pair, x) in pairs
            .iter()
            .zip(spread(pairs.len(), ANIMAL_SIZE.width, size.width))
        {
            let position = Vec2::new(x, ANIMAL_TOP);
            let container = surface.append(
                Some(self.animal_area),
                ElementSpec::new("animal-container")
                    .at(position)
                    .sized(ANIMAL_SIZE),
            );
            let face = surface.append(
                Some(container),
                ElementSpec::new("animal-emoji").text(pair.animal).at(position),
            );
            surface.append(
                Some(container),
                ElementSpec::new("animal-name").text(pair.animal_name),
            );
            self.drag
                .add_single_use_target_element(pair.animal_type, container, |item, key| item == key);
            state.animals.push(Animal {
                container,
                face,
                pair,
            });
        }

        let food_top = size.height - FOOD_BOTTOM_MARGIN;
        for (&pair, x) in foods
            .iter()
            .zip(spread(foods.len(), FOOD_SIZE.width, size.width))
        {
            let food = surface.append(
                Some(self.food_area),
                ElementSpec::new("food-item")
                    .text(pair.food)
                    .at(Vec2::new(x, food_top))
                    .sized(FOOD_SIZE),
            );
            self.drag.add_draggable(food, pair.animal_type);
            state.foods.push((food, pair));
        }
        drop(state);
        info!(activity = HUNGRY_ANIMALS_MANIFEST.id, level, "level started");
    }

    fn resolved(self: &Rc<Self>, report: &DragReport<&'static str, &'static str>) {
        match report.outcome {
            DropOutcome::Match(key) => self.fed(report.element, key),
            DropOutcome::Mismatch(key) => self.refused(report.element, key),
            DropOutcome::Miss => {}
        }
    }

    fn animal(&self, animal_type: &str) -> Option<(ElementId, ElementId, &'static AnimalPair)> {
        self.state
            .borrow()
            .animals
            .iter()
            .find(|a| a.pair.animal_type == animal_type)
            .map(|a| (a.container, a.face, a.pair))
    }

    fn fed(self: &Rc<Self>, food: ElementId, animal_type: &'static str) {
        let Some((container, _, pair)) = self.animal(animal_type) else {
            return;
        };
        let surface = self.stage.surface();
        let services = self.stage.services();

        let score = {
            let mut state = self.state.borrow_mut();
            state.score += MATCH_POINTS;
            state.matches += 1;
            state.score
        };
        surface.set_text(self.score_label, &score_text(score));
        surface.set_class(container, "fed", true);
        surface.set_class(container, "eating", true);
        services.audio.play_cue(Cue::Success);
        services.voice.speak(&pair.sentence());

        let center = surface.bounds(container).map(|r| r.center());
        if let Some(center) = center {
            services.effects.burst(center.x, center.y, MATCH_BURST);
            for i in 0..HEARTS {
                self.later(i * HEART_SPACING_MS, move |round| {
                    let surface = round.stage.surface();
                    let heart = surface.append(
                        Some(container),
                        ElementSpec::new("heart").text("❤️").at(center),
                    );
                    round.later(HEART_LIFETIME_MS, move |round| {
                        round.stage.surface().remove(heart);
                    });
                });
            }
        }

        self.later(FOOD_FADE_MS, move |round| {
            round.stage.surface().set_class(food, "fading", true);
            round.later(FOOD_REMOVE_MS, move |round| {
                round.drag.remove_draggable(food);
                round.stage.surface().remove(food);
                round.state.borrow_mut().foods.retain(|(id, _)| *id != food);
            });
        });
        self.later(CHECK_DELAY_MS, |round| round.check_complete());
        debug!(activity = HUNGRY_ANIMALS_MANIFEST.id, animal = animal_type, score, "animal fed");
    }

    fn refused(self: &Rc<Self>, food: ElementId, animal_type: &'static str) {
        self.stage.services().audio.play_cue(Cue::Thud);
        let face = self.animal(animal_type).map(|(_, face, _)| face);
        let surface = self.stage.surface();
        if let Some(face) = face {
            surface.set_class(face, "head-shake", true);
        }
        surface.set_class(food, "bounce-back", true);
        self.later(MISMATCH_RETURN_MS, move |round| {
            let surface = round.stage.surface();
            if let Some(face) = face {
                surface.set_class(face, "head-shake", false);
            }
            surface.set_class(food, "bounce-back", false);
        });
    }

    fn check_complete(self: &Rc<Self>) {
        let level = {
            let mut state = self.state.borrow_mut();
            if state.completed || state.matches < state.level {
                return;
            }
            state.completed = true;
            state.level
        };

        if level >= FINAL_LEVEL {
            self.celebrate();
            return;
        }

        let surface = self.stage.surface();
        surface.set_text(self.banner, "Level Complete!");
        surface.set_class(self.banner, "show", true);
        let services = self.stage.services();
        services.voice.speak("Bravo! Niveau suivant!");
        let center = surface.size().half();
        services.effects.burst(center.x, center.y, LEVEL_BURST);
        self.later(NEXT_LEVEL_MS, move |round| round.setup_level(level + 1));
    }

    fn celebrate(self: &Rc<Self>) {
        let surface = self.stage.surface();
        let score = self.state.borrow().score;

        let overlay = surface.append(None, ElementSpec::new("completion-celebration"));
        surface.append(Some(overlay), ElementSpec::new("celebration-trophy").text("🏆"));
        surface.append(
            Some(overlay),
            ElementSpec::new("celebration-message").text("Tous les animaux sont nourris!"),
        );
        surface.append(
            Some(overlay),
            ElementSpec::new("celebration-score").text(score_text(score)),
        );
        self.state.borrow_mut().overlay = Some(overlay);

        self.stage.services().voice.speak(&format!(
            "Félicitations! Tu as nourri tous les animaux! Score final: {score} points!"
        ));
        for i in 0..FINAL_BURSTS {
            self.later(i * FINAL_BURST_SPACING_MS, |round| {
                let size = round.stage.surface().size();
                let x = size.width * round.stage.random_range(0.0, 1.0);
                let y = size.height * round.stage.random_range(0.0, 1.0);
                round.stage.services().effects.burst(x, y, FINAL_BURST);
            });
        }
        self.later(RESTART_MS, |round| {
            round.state.borrow_mut().score = 0;
            round.stage.surface().set_text(round.score_label, &score_text(0));
            round.setup_level(1);
        });
        info!(activity = HUNGRY_ANIMALS_MANIFEST.id, score, "all animals fed");
    }
}
