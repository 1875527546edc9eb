//! Audio cues

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::store::Store;

/// Short synthesized sound
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    /// Tap, pop, menu transition
    Pop,
    /// Rejected drop
    Thud,
    /// Accepted drop
    Success,
    /// Level or round complete
    Chime,
    /// Sustained piano note
    Note(Note),
    /// Synthesized animal call
    Animal(AnimalCall),
}

/// Piano key pitch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Note {
    C4,
    D4,
    E4,
    F4,
    G4,
}

impl Note {
    /// Pitch in Hz
    pub fn frequency(self) -> f32 {
        match self {
            Note::C4 => 261.63,
            Note::D4 => 293.66,
            Note::E4 => 329.63,
            Note::F4 => 349.23,
            Note::G4 => 392.00,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimalCall {
    Bark,
    Meow,
    Moo,
    Quack,
    Baa,
    Oink,
}

/// Plays audio cues
pub trait AudioCues {
    fn play_cue(&self, cue: Cue);
}

/// Silent implementation
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopAudio;

impl AudioCues for NoopAudio {
    fn play_cue(&self, _cue: Cue) {}
}

/// Drops cues while the store is muted
pub struct MuteAwareAudio {
    inner: Rc<dyn AudioCues>,
    store: Store,
}

impl MuteAwareAudio {
    pub fn new(inner: Rc<dyn AudioCues>, store: Store) -> Self {
        Self { inner, store }
    }
}

impl AudioCues for MuteAwareAudio {
    fn play_cue(&self, cue: Cue) {
        if !self.store.is_muted() {
            self.inner.play_cue(cue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct CueLog {
        cues: RefCell<Vec<Cue>>,
    }

    impl CueLog {
        fn cues(&self) -> Vec<Cue> {
            self.cues.borrow().clone()
        }
    }

    impl AudioCues for CueLog {
        fn play_cue(&self, cue: Cue) {
            self.cues.borrow_mut().push(cue);
        }
    }

    #[test]
    fn test_mute_aware_audio() {
        let log = Rc::new(CueLog::default());
        let store = Store::in_memory();
        let audio = MuteAwareAudio::new(log.clone(), store.clone());

        audio.play_cue(Cue::Pop);
        store.set_muted(true);
        audio.play_cue(Cue::Thud);
        store.set_muted(false);
        audio.play_cue(Cue::Success);

        assert_eq!(log.cues(), vec![Cue::Pop, Cue::Success]);
    }

    #[test]
    fn test_cue_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Cue::Success).unwrap(), "\"success\"");
        assert_eq!(
            serde_json::to_string(&Cue::Animal(AnimalCall::Moo)).unwrap(),
            r#"{"animal":"moo"}"#
        );
    }

    #[test]
    fn test_notes_ascend() {
        let notes = [Note::C4, Note::D4, Note::E4, Note::F4, Note::G4];
        assert!(notes.windows(2).all(|w| w[0].frequency() < w[1].frequency()));
        assert!((Note::C4.frequency() - 261.63).abs() < 0.001);
    }

    #[test]
    fn test_mute_aware_audio_drops_notes() {
        let log = Rc::new(CueLog::default());
        let store = Store::in_memory();
        let audio = MuteAwareAudio::new(log.clone(), store.clone());

        store.set_muted(true);
        audio.play_cue(Cue::Note(Note::E4));
        store.set_muted(false);
        audio.play_cue(Cue::Note(Note::G4));

        assert_eq!(log.cues(), vec![Cue::Note(Note::G4)]);
    }
}
