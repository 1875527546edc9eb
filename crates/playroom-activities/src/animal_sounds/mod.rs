//! Animal Sounds
//!
//! A grid of animal cards. Tapping a card says the animal's name, plays its
//! call and wiggles the card; taps on a wiggling card are ignored.

use std::cell::Cell;
use std::rc::Rc;

use playroom_core::{
    Activity, ActivityContext, ActivityError, ActivityManifest, Cue, ElementId, ElementSpec,
    EventKind, EventTarget, Lifecycle, ListenOptions, Size, Stage, Vec2,
};
use tracing::trace;

use crate::catalog::{AnimalCard, ANIMAL_CARDS};
use crate::layout::{require_size, spread};
use crate::manifest::ANIMAL_SOUNDS_MANIFEST;

/// How long a tapped card animates (ms)
pub const ANIMATION_MS: u32 = 500;

/// Particles per tap
pub const TAP_BURST: u32 = 20;

const COLUMNS: usize = 3;
const CARD_SIZE: Size = Size::new(160.0, 160.0);
const GRID_TOP: f32 = 100.0;
const ROW_GAP: f32 = 30.0;
const MIN_SURFACE: Size = Size::new(560.0, 480.0);

/// Tap an animal, hear its call
pub struct AnimalSounds {
    lifecycle: Lifecycle,
    cards: Vec<Rc<Card>>,
}

struct Card {
    element: ElementId,
    animal: &'static AnimalCard,
    animating: Cell<bool>,
}

impl AnimalSounds {
    pub fn new(context: ActivityContext) -> Self {
        Self {
            lifecycle: Lifecycle::new(context, ANIMAL_SOUNDS_MANIFEST.id),
            cards: Vec::new(),
        }
    }

    /// Card elements with their animal type, in grid order
    pub fn cards(&self) -> Vec<(ElementId, &'static str)> {
        self.cards
            .iter()
            .map(|c| (c.element, c.animal.animal_type))
            .collect()
    }
}

impl Activity for AnimalSounds {
    fn manifest(&self) -> &'static ActivityManifest {
        &ANIMAL_SOUNDS_MANIFEST
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

        let grid = surface.append(
            None,
            ElementSpec::new("animal-grid")
                .at(Vec2::new(0.0, GRID_TOP))
                .sized(Size::new(size.width, 2.0 * CARD_SIZE.height + ROW_GAP)),
        );
        let columns = spread(COLUMNS, CARD_SIZE.width, size.width);

        self.cards.clear();
        for (i, animal) in ANIMAL_CARDS.iter().enumerate() {
            let row = (i / COLUMNS) as f32;
            let position = Vec2::new(
                columns[i % COLUMNS],
                GRID_TOP + row * (CARD_SIZE.height + ROW_GAP),
            );
            let element = surface.append(
                Some(grid),
                ElementSpec::new("animal-card")
                    .text(animal.emoji)
                    .color(animal.css)
                    .at(position)
                    .sized(CARD_SIZE),
            );
            let card = Rc::new(Card {
                element,
                animal,
                animating: Cell::new(false),
            });

            let tapped = Rc::downgrade(&card);
            let owner = stage.clone();
            stage.scope().listen(
                EventTarget::Element(element),
                EventKind::PointerDown,
                ListenOptions::default(),
                move |_| {
                    if let Some(card) = tapped.upgrade() {
                        card.tap(&owner);
                    }
                },
            );
            self.cards.push(card);
        }
        Ok(())
    }

    fn teardown(&mut self) {
        self.cards.clear();
    }
}

impl Card {
    fn tap(self: &Rc<Self>, stage: &Stage) {
        if !stage.is_mounted() || self.animating.replace(true) {
            return;
        }
        let services = stage.services();
        services.voice.speak(self.animal.name_fr);
        services.audio.play_cue(Cue::Animal(self.animal.call));

        let surface = stage.surface();
        surface.set_class(self.element, "animating", true);
        if let Some(rect) = surface.bounds(self.element) {
            let center = rect.center();
            services.effects.burst(center.x, center.y, TAP_BURST);
        }
        trace!(activity = ANIMAL_SOUNDS_MANIFEST.id, animal = self.animal.animal_type, "card tapped");

        let card = Rc::downgrade(self);
        let owner = stage.clone();
        stage.scope().schedule_once(ANIMATION_MS, move || {
            let Some(card) = card.upgrade() else {
                return;
            };
            card.animating.set(false);
            if owner.is_mounted() {
                owner.surface().set_class(card.element, "animating", false);
            }
        });
    }
}
