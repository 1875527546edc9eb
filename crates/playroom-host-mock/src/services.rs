//! Recording services

use std::cell::RefCell;
use std::rc::Rc;

use playroom_core::{Announcer, AudioCues, Celebration, Cue, Services, Store};

/// Captures every cue
#[derive(Debug, Default)]
pub struct RecordingAudio {
    cues: RefCell<Vec<Cue>>,
}

impl RecordingAudio {
    pub fn cues(&self) -> Vec<Cue> {
        self.cues.borrow().clone()
    }

    pub fn count(&self, cue: Cue) -> usize {
        self.cues.borrow().iter().filter(|c| **c == cue).count()
    }
}

impl AudioCues for RecordingAudio {
    fn play_cue(&self, cue: Cue) {
        self.cues.borrow_mut().push(cue);
    }
}

/// Captures every announcement
#[derive(Debug, Default)]
pub struct RecordingAnnouncer {
    spoken: RefCell<Vec<String>>,
    stops: RefCell<usize>,
}

impl RecordingAnnouncer {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.borrow().clone()
    }

    pub fn stops(&self) -> usize {
        *self.stops.borrow()
    }
}

impl Announcer for RecordingAnnouncer {
    fn speak(&self, text: &str) {
        self.spoken.borrow_mut().push(text.to_string());
    }

    fn stop(&self) {
        *self.stops.borrow_mut() += 1;
    }
}

/// One recorded burst
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Burst {
    pub x: f32,
    pub y: f32,
    pub count: u32,
}

/// Captures every burst
#[derive(Debug, Default)]
pub struct RecordingCelebration {
    bursts: RefCell<Vec<Burst>>,
}

impl RecordingCelebration {
    pub fn bursts(&self) -> Vec<Burst> {
        self.bursts.borrow().clone()
    }
}

impl Celebration for RecordingCelebration {
    fn burst(&self, x: f32, y: f32, count: u32) {
        self.bursts.borrow_mut().push(Burst { x, y, count });
    }
}

/// The three recorders bundled together
#[derive(Clone, Default)]
pub struct RecordingServices {
    pub audio: Rc<RecordingAudio>,
    pub voice: Rc<RecordingAnnouncer>,
    pub effects: Rc<RecordingCelebration>,
}

impl RecordingServices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Services writing into these recorders
    pub fn services(&self) -> Services {
        Services::new(self.audio.clone(), self.voice.clone(), self.effects.clone())
    }

    /// Same as [`RecordingServices::services`], silenced while `store` is muted
    pub fn mute_aware(&self, store: &Store) -> Services {
        self.services().mute_aware(store)
    }
}
