//! Playroom activities
//!
//! The nine activities of the suite, built on `playroom-core`, in menu order:
//!
//! - [`BalloonPop`]: tap rising balloons
//! - [`MusicalPiano`]: five colored keys
//! - [`ColorSorter`]: drag balls into the bucket of their color
//! - [`AnimalSounds`]: tap an animal to hear its call
//! - [`ShapeMatch`]: drag shapes into their outlines
//! - [`MemoryGame`]: find the pairs
//! - [`MoleGame`]: tap the moles before they duck
//! - [`DrawingPad`]: finger painting
//! - [`HungryAnimals`]: drag each food onto the animal that eats it
//!
//! Every timer, frame callback and listener an activity creates goes through
//! its stage's scope, so unmounting releases all of them.

pub mod animal_sounds;
pub mod balloon_pop;
pub mod catalog;
pub mod color_sorter;
pub mod drawing_pad;
pub mod hungry_animals;
pub mod layout;
pub mod manifest;
pub mod memory_game;
pub mod mole_game;
pub mod musical_piano;
pub mod shape_match;

pub use animal_sounds::AnimalSounds;
pub use balloon_pop::BalloonPop;
pub use color_sorter::ColorSorter;
pub use drawing_pad::DrawingPad;
pub use hungry_animals::HungryAnimals;
pub use manifest::{
    ANIMAL_SOUNDS_MANIFEST, BALLOON_POP_MANIFEST, COLOR_SORTER_MANIFEST, DRAWING_PAD_MANIFEST,
    HUNGRY_ANIMALS_MANIFEST, MEMORY_GAME_MANIFEST, MOLE_GAME_MANIFEST, MUSICAL_PIANO_MANIFEST,
    SHAPE_MATCH_MANIFEST,
};
pub use memory_game::MemoryGame;
pub use mole_game::MoleGame;
pub use musical_piano::MusicalPiano;
pub use shape_match::ShapeMatch;

use playroom_core::{Activity, ActivityContext, Orchestrator, OrchestratorError};

/// One instance of every activity, in menu order
pub fn default_activities(context: &ActivityContext) -> Vec<Box<dyn Activity>> {
    vec![
        Box::new(BalloonPop::new(context.clone())),
        Box::new(MusicalPiano::new(context.clone())),
        Box::new(ColorSorter::new(context.clone())),
        Box::new(AnimalSounds::new(context.clone())),
        Box::new(ShapeMatch::new(context.clone())),
        Box::new(MemoryGame::new(context.clone())),
        Box::new(MoleGame::new(context.clone())),
        Box::new(DrawingPad::new(context.clone())),
        Box::new(HungryAnimals::new(context.clone())),
    ]
}

/// Register every activity with `orchestrator`
pub fn register_all(
    orchestrator: &mut Orchestrator,
    context: &ActivityContext,
) -> Result<(), OrchestratorError> {
    for activity in default_activities(context) {
        orchestrator.register(activity)?;
    }
    Ok(())
}
