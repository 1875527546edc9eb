//! Handles returned by scope acquisitions

/// Kind of resource a scope tracks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Repeating timer
    Periodic,
    /// One-shot timer
    Once,
    /// Next-frame callback
    Frame,
    /// Input listener
    Listener,
}

/// Handle to one resource acquired through a [`ResourceScope`](super::ResourceScope)
///
/// Handles are plain values; cancelling one twice, cancelling one that has
/// already fired, or cancelling an inert one does nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Handle {
    pub(crate) id: u64,
    pub(crate) kind: ResourceKind,
}

impl Handle {
    /// Handle returned when a scope refuses an acquisition because it has
    /// already been released
    pub(crate) const fn inert(kind: ResourceKind) -> Self {
        Self { id: 0, kind }
    }

    /// Resource kind
    #[inline]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Whether this handle was refused by an inactive scope
    #[inline]
    pub fn is_inert(&self) -> bool {
        self.id == 0
    }
}

/// Outstanding resources of a scope, by kind
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScopeStats {
    pub periodic: usize,
    pub once: usize,
    pub frames: usize,
    pub listeners: usize,
}

impl ScopeStats {
    /// Total outstanding resources
    pub fn total(&self) -> usize {
        self.periodic + self.once + self.frames + self.listeners
    }

    pub(crate) fn count(&mut self, kind: ResourceKind) {
        match kind {
            ResourceKind::Periodic => self.periodic += 1,
            ResourceKind::Once => self.once += 1,
            ResourceKind::Frame => self.frames += 1,
            ResourceKind::Listener => self.listeners += 1,
        }
    }
}
