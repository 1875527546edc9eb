//! Fixed content shown by the activities

use playroom_core::{AnimalCall, Note};

/// Balloon color with its spoken name
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BalloonColor {
    pub css: &'static str,
    pub name_fr: &'static str,
}

pub static BALLOON_COLORS: [BalloonColor; 8] = [
    BalloonColor { css: "#FF6B6B", name_fr: "Rouge" },
    BalloonColor { css: "#0C67C3", name_fr: "Bleu" },
    BalloonColor { css: "#FFE66D", name_fr: "Jaune" },
    BalloonColor { css: "#26E472", name_fr: "Vert" },
    BalloonColor { css: "#000000", name_fr: "Noir" },
    BalloonColor { css: "#AA96DA", name_fr: "Violet" },
    BalloonColor { css: "#FCBAD3", name_fr: "Rose" },
    BalloonColor { css: "#FFFFFF", name_fr: "Blanc" },
];

/// Sortable color; `key` matches a ball to its bucket
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortColor {
    pub key: &'static str,
    pub name_fr: &'static str,
    pub css: &'static str,
    pub emoji: &'static str,
}

pub static SORT_COLORS: [SortColor; 3] = [
    SortColor { key: "red", name_fr: "Rouge", css: "#FF6B6B", emoji: "🔴" },
    SortColor { key: "blue", name_fr: "Bleu", css: "#006FEE", emoji: "🔵" },
    SortColor { key: "green", name_fr: "Vert", css: "#95E1D3", emoji: "🟢" },
];

/// Look up a sortable color by key
pub fn sort_color(key: &str) -> Option<&'static SortColor> {
    SORT_COLORS.iter().find(|c| c.key == key)
}

/// An animal and the food it eats
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimalPair {
    pub animal: &'static str,
    pub animal_name: &'static str,
    /// Matches a food to its animal
    pub animal_type: &'static str,
    pub food: &'static str,
    pub food_name: &'static str,
}

impl AnimalPair {
    /// Sentence spoken when the animal is fed
    pub fn sentence(&self) -> String {
        format!("{} mange {}!", self.animal_name, self.food_name)
    }
}

pub static ANIMAL_PAIRS: [AnimalPair; 6] = [
    AnimalPair { animal: "🐰", animal_name: "Le lapin", animal_type: "rabbit", food: "🥕", food_name: "la carotte" },
    AnimalPair { animal: "🐶", animal_name: "Le chien", animal_type: "dog", food: "🦴", food_name: "l'os" },
    AnimalPair { animal: "🐵", animal_name: "Le singe", animal_type: "monkey", food: "🍌", food_name: "la banane" },
    AnimalPair { animal: "🐱", animal_name: "Le chat", animal_type: "cat", food: "🐟", food_name: "le poisson" },
    AnimalPair { animal: "🐼", animal_name: "Le panda", animal_type: "panda", food: "🎋", food_name: "le bambou" },
    AnimalPair { animal: "🦁", animal_name: "Le lion", animal_type: "lion", food: "🥩", food_name: "la viande" },
];

/// Look up an animal by type
pub fn animal(animal_type: &str) -> Option<&'static AnimalPair> {
    ANIMAL_PAIRS.iter().find(|p| p.animal_type == animal_type)
}

/// Piano key with its color
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PianoKey {
    pub note: Note,
    pub label: &'static str,
    pub css: &'static str,
    pub color_name: &'static str,
}

pub static PIANO_KEYS: [PianoKey; 5] = [
    PianoKey { note: Note::C4, label: "C", css: "#FF6B6B", color_name: "Rouge" },
    PianoKey { note: Note::D4, label: "D", css: "#4ECDC4", color_name: "Turquoise" },
    PianoKey { note: Note::E4, label: "E", css: "#FFE66D", color_name: "Jaune" },
    PianoKey { note: Note::F4, label: "F", css: "#95E1D3", color_name: "Vert" },
    PianoKey { note: Note::G4, label: "G", css: "#AA96DA", color_name: "Violet" },
];

/// Animal card of the sound board
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimalCard {
    pub emoji: &'static str,
    pub animal_type: &'static str,
    pub name_fr: &'static str,
    pub css: &'static str,
    pub call: AnimalCall,
}

pub static ANIMAL_CARDS: [AnimalCard; 6] = [
    AnimalCard { emoji: "🐶", animal_type: "dog", name_fr: "Le chien", css: "#FFE4B5", call: AnimalCall::Bark },
    AnimalCard { emoji: "🐱", animal_type: "cat", name_fr: "Le chat", css: "#FFB6C1", call: AnimalCall::Meow },
    AnimalCard { emoji: "🐮", animal_type: "cow", name_fr: "La vache", css: "#F5DEB3", call: AnimalCall::Moo },
    AnimalCard { emoji: "🦆", animal_type: "duck", name_fr: "Le canard", css: "#FFFFE0", call: AnimalCall::Quack },
    AnimalCard { emoji: "🐑", animal_type: "sheep", name_fr: "Le mouton", css: "#FFFAF0", call: AnimalCall::Baa },
    AnimalCard { emoji: "🐷", animal_type: "pig", name_fr: "Le cochon", css: "#FFC0CB", call: AnimalCall::Oink },
];

/// Shape to slot into its outline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shape {
    pub key: &'static str,
    pub emoji: &'static str,
    pub name_fr: &'static str,
    pub css: &'static str,
}

/// Level N uses the first N shapes
pub static SHAPES: [Shape; 4] = [
    Shape { key: "circle", emoji: "🔴", name_fr: "Le cercle", css: "#ff6b6b" },
    Shape { key: "square", emoji: "🟦", name_fr: "Le carré", css: "#4ecdc4" },
    Shape { key: "triangle", emoji: "🔺", name_fr: "Le triangle", css: "#ffe66d" },
    Shape { key: "star", emoji: "⭐", name_fr: "L'étoile", css: "#ffd700" },
];

/// Praise spoken after a correct match
pub static PRAISE: [&str; 6] = ["Bravo !", "Très bien !", "Excellent !", "Super !", "Génial !", "Parfait !"];

/// Face of a memory card; two cards share each face
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardFace {
    pub emoji: &'static str,
    pub kind: &'static str,
    pub name_fr: &'static str,
}

pub static CARD_FACES: [CardFace; 8] = [
    CardFace { emoji: "🐶", kind: "dog", name_fr: "Le chien" },
    CardFace { emoji: "🍎", kind: "apple", name_fr: "La pomme" },
    CardFace { emoji: "🐱", kind: "cat", name_fr: "Le chat" },
    CardFace { emoji: "🍌", kind: "banana", name_fr: "La banane" },
    CardFace { emoji: "🐰", kind: "rabbit", name_fr: "Le lapin" },
    CardFace { emoji: "🍊", kind: "orange", name_fr: "L'orange" },
    CardFace { emoji: "🐻", kind: "bear", name_fr: "L'ours" },
    CardFace { emoji: "🍇", kind: "grapes", name_fr: "Les raisins" },
];

/// Drawing colors, the first one selected on mount
pub static PEN_COLORS: [&str; 5] = ["#ff0000", "#00ff00", "#0000ff", "#ffff00", "#ff00ff"];
