//! Activity manifests, in menu order

use playroom_core::ActivityManifest;

pub static BALLOON_POP_MANIFEST: ActivityManifest =
    ActivityManifest::new("balloon-pop", "Balloon Pop", "🎈");

pub static MUSICAL_PIANO_MANIFEST: ActivityManifest =
    ActivityManifest::new("musical-piano", "Musical Piano", "🎹");

pub static COLOR_SORTER_MANIFEST: ActivityManifest =
    ActivityManifest::new("color-sorter", "Color Sorter", "🗑️");

pub static ANIMAL_SOUNDS_MANIFEST: ActivityManifest =
    ActivityManifest::new("animal-sounds", "Animal Sounds", "🐶");

pub static SHAPE_MATCH_MANIFEST: ActivityManifest =
    ActivityManifest::new("shape-match", "Shape Match", "🔺");

pub static MEMORY_GAME_MANIFEST: ActivityManifest =
    ActivityManifest::new("memory-game", "Memory Game", "🃏");

pub static MOLE_GAME_MANIFEST: ActivityManifest =
    ActivityManifest::new("mole-game", "Whack-a-Mole", "🐹");

pub static DRAWING_PAD_MANIFEST: ActivityManifest =
    ActivityManifest::new("drawing-pad", "Drawing Pad", "🎨");

pub static HUNGRY_ANIMALS_MANIFEST: ActivityManifest =
    ActivityManifest::new("hungry-animals", "Hungry Animals", "🍽️");
