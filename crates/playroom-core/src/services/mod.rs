//! Shared services
//!
//! Fire-and-forget collaborators every activity may call: short audio cues,
//! spoken announcements and celebration bursts. Only the call contracts live
//! here; the browser implementations are in `playroom-web`.
//!
//! Activities receive services through [`Services`] and never construct
//! them. The default set does nothing.

mod audio;
mod effects;
mod speech;

use std::fmt;
use std::rc::Rc;

use crate::store::Store;

pub use audio::{AnimalCall, AudioCues, Cue, MuteAwareAudio, NoopAudio, Note};
pub use effects::{Celebration, NoopCelebration};
pub use speech::{Announcer, MuteAwareAnnouncer, NoopAnnouncer};

/// Bundle of shared services injected into activities
#[derive(Clone)]
pub struct Services {
    pub audio: Rc<dyn AudioCues>,
    pub voice: Rc<dyn Announcer>,
    pub effects: Rc<dyn Celebration>,
}

impl Services {
    pub fn new(
        audio: Rc<dyn AudioCues>,
        voice: Rc<dyn Announcer>,
        effects: Rc<dyn Celebration>,
    ) -> Self {
        Self {
            audio,
            voice,
            effects,
        }
    }

    /// Wrap audio and voice so they go silent while `store` is muted
    pub fn mute_aware(self, store: &Store) -> Self {
        Self {
            audio: Rc::new(MuteAwareAudio::new(self.audio, store.clone())),
            voice: Rc::new(MuteAwareAnnouncer::new(self.voice, store.clone())),
            effects: self.effects,
        }
    }
}

impl Default for Services {
    fn default() -> Self {
        Self {
            audio: Rc::new(NoopAudio),
            voice: Rc::new(NoopAnnouncer),
            effects: Rc::new(NoopCelebration),
        }
    }
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}
