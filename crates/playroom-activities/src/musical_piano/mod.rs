//! Musical Piano
//!
//! Five colored keys, each playing one note of the C major scale with a
//! small confetti burst above the key.

use playroom_core::{
    Activity, ActivityContext, ActivityError, ActivityManifest, Cue, ElementId, ElementSpec,
    EventKind, EventTarget, Lifecycle, ListenOptions, Size, Stage, Vec2,
};
use tracing::trace;

use crate::catalog::{PianoKey, PIANO_KEYS};
use crate::layout::{require_size, spread};
use crate::manifest::MUSICAL_PIANO_MANIFEST;

/// How long a pressed key stays highlighted (ms)
pub const KEY_ACTIVE_MS: u32 = 200;

/// Particles per key press
pub const KEY_BURST: u32 = 15;

const KEY_SIZE: Size = Size::new(100.0, 250.0);
const KEY_TOP: f32 = 160.0;
const MIN_SURFACE: Size = Size::new(560.0, 440.0);

/// Five-key piano
pub struct MusicalPiano {
    lifecycle: Lifecycle,
    keys: Vec<(ElementId, &'static PianoKey)>,
}

impl MusicalPiano {
    pub fn new(context: ActivityContext) -> Self {
        Self {
            lifecycle: Lifecycle::new(context, MUSICAL_PIANO_MANIFEST.id),
            keys: Vec::new(),
        }
    }

    /// Key elements with their key, left to right
    pub fn keys(&self) -> Vec<(ElementId, &'static PianoKey)> {
        self.keys.clone()
    }
}

impl Activity for MusicalPiano {
    fn manifest(&self) -> &'static ActivityManifest {
        &MUSICAL_PIANO_MANIFEST
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
            ElementSpec::new("piano-instruction").text("🎹 Joue du piano!"),
        );
        let board = surface.append(
            None,
            ElementSpec::new("piano-container")
                .at(Vec2::new(0.0, KEY_TOP))
                .sized(Size::new(size.width, KEY_SIZE.height)),
        );

        self.keys.clear();
        for (key, x) in PIANO_KEYS
            .iter()
            .zip(spread(PIANO_KEYS.len(), KEY_SIZE.width, size.width))
        {
            let element = surface.append(
                Some(board),
                ElementSpec::new("piano-key")
                    .text(key.label)
                    .color(key.css)
                    .at(Vec2::new(x, KEY_TOP))
                    .sized(KEY_SIZE),
            );
            let pressed = stage.clone();
            stage.scope().listen(
                EventTarget::Element(element),
                EventKind::PointerDown,
                ListenOptions::default(),
                move |_| press(&pressed, element, key),
            );
            self.keys.push((element, key));
        }

        stage.services().audio.play_cue(Cue::Pop);
        stage.services().voice.speak("Joue du piano!");
        Ok(())
    }

    fn teardown(&mut self) {
        self.keys.clear();
    }
}

fn press(stage: &Stage, element: ElementId, key: &'static PianoKey) {
    if !stage.is_mounted() {
        return;
    }
    let surface = stage.surface();
    surface.set_class(element, "piano-key-active", true);
    stage.services().audio.play_cue(Cue::Note(key.note));
    if let Some(rect) = surface.bounds(element) {
        stage
            .services()
            .effects
            .burst(rect.center().x, rect.y, KEY_BURST);
    }
    trace!(activity = MUSICAL_PIANO_MANIFEST.id, key = key.label, "key pressed");

    let released = stage.clone();
    stage.scope().schedule_once(KEY_ACTIVE_MS, move || {
        if released.is_mounted() {
            released.surface().set_class(element, "piano-key-active", false);
        }
    });
}
