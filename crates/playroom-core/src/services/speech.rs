//! Spoken announcements

use std::rc::Rc;

use crate::store::Store;

/// Speaks short phrases aloud
pub trait Announcer {
    /// Speak `text`, interrupting anything still being spoken
    fn speak(&self, text: &str);

    /// Stop speaking
    fn stop(&self) {}
}

/// Silent implementation
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopAnnouncer;

impl Announcer for NoopAnnouncer {
    fn speak(&self, _text: &str) {}
}

/// Drops announcements while the store is muted
pub struct MuteAwareAnnouncer {
    inner: Rc<dyn Announcer>,
    store: Store,
}

impl MuteAwareAnnouncer {
    pub fn new(inner: Rc<dyn Announcer>, store: Store) -> Self {
        Self { inner, store }
    }
}

impl Announcer for MuteAwareAnnouncer {
    fn speak(&self, text: &str) {
        if !self.store.is_muted() {
            self.inner.speak(text);
        }
    }

    fn stop(&self) {
        self.inner.stop();
    }
}
