//! Drag state machine
//!
//! [`DragTracker`] holds draggables, targets and the live session, and
//! applies each pointer step to a [`Surface`]. It never touches the host:
//! listener wiring and delayed returns live in
//! [`DragController`](super::DragController).

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use super::{resolve, DragSession, DropOutcome, DropTarget};
use crate::host::{ElementId, PointerEvent, PointerId, Surface};
use crate::math::Vec2;

/// Outcome of one resolved drag, delivered to the resolve callback
#[derive(Clone, Debug, PartialEq)]
pub struct DragReport<I, K> {
    /// Element that was dragged
    pub element: ElementId,
    /// Item registered for the element
    pub item: I,
    pub outcome: DropOutcome<K>,
    /// Element position at pick-up
    pub origin: Vec2,
    /// Element center at release
    pub drop_point: Vec2,
    /// Where the element settles once resolution completes
    pub resting_position: Vec2,
}

struct Draggable<I> {
    item: I,
    enabled: bool,
}

/// Pure drag-and-drop state machine: Idle -> Dragging -> Idle
pub struct DragTracker<I, K> {
    draggables: BTreeMap<ElementId, Draggable<I>>,
    targets: Vec<DropTarget<I, K>>,
    session: Option<DragSession>,
    returning: BTreeSet<ElementId>,
    lifted_class: String,
    epoch: u64,
}

impl<I: Clone, K: Clone> DragTracker<I, K> {
    pub fn new(lifted_class: impl Into<String>) -> Self {
        Self {
            draggables: BTreeMap::new(),
            targets: Vec::new(),
            session: None,
            returning: BTreeSet::new(),
            lifted_class: lifted_class.into(),
            epoch: 0,
        }
    }

    /// Make `element` draggable, carrying `item`
    pub fn add_draggable(&mut self, element: ElementId, item: I) {
        self.draggables.insert(element, Draggable { item, enabled: true });
    }

    /// Forget a draggable; a session on it is discarded
    pub fn remove_draggable(&mut self, element: ElementId) -> bool {
        if self.session.as_ref().is_some_and(|s| s.element == element) {
            self.session = None;
        }
        self.returning.remove(&element);
        self.draggables.remove(&element).is_some()
    }

    /// Registered and not yet matched
    pub fn is_draggable(&self, element: ElementId) -> bool {
        self.draggables.get(&element).is_some_and(|d| d.enabled)
    }

    pub fn item(&self, element: ElementId) -> Option<&I> {
        self.draggables.get(&element).map(|d| &d.item)
    }

    pub fn draggable_count(&self) -> usize {
        self.draggables.len()
    }

    /// Append a target; returns its index
    pub fn add_target(&mut self, target: DropTarget<I, K>) -> usize {
        self.targets.push(target);
        self.targets.len() - 1
    }

    pub fn targets(&self) -> &[DropTarget<I, K>] {
        &self.targets
    }

    /// Whether every single-use target has been filled (false when there are none)
    pub fn all_single_use_filled(&self) -> bool {
        let mut single_use = self.targets.iter().filter(|t| t.is_single_use()).peekable();
        single_use.peek().is_some() && single_use.all(DropTarget::is_filled)
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Start dragging `element` with the pointer of `event`.
    ///
    /// Refused while another session is live, while the element is travelling
    /// back from a rejected drop, or when the element is unknown, disabled or
    /// detached.
    pub fn pick_up(&mut self, surface: &dyn Surface, element: ElementId, event: &PointerEvent) -> bool {
        if self.session.is_some() || self.returning.contains(&element) || !self.is_draggable(element) {
            return false;
        }
        let Some(bounds) = surface.bounds(element) else {
            return false;
        };
        surface.capture_pointer(element, event.pointer_id);
        surface.set_class(element, &self.lifted_class, true);
        trace!(?element, pointer = event.pointer_id.0, "pick up");
        self.session = Some(DragSession::new(element, event.pointer_id, event.position, bounds));
        true
    }

    /// Follow the bound pointer. Other pointers are ignored.
    pub fn drag_to(&mut self, surface: &dyn Surface, event: &PointerEvent) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.pointer != event.pointer_id {
            return false;
        }
        if !surface.contains(session.element) {
            debug!(element = ?session.element, "dragged element detached, discarding session");
            self.session = None;
            return false;
        }
        let position = session.move_to(event.position);
        surface.set_position(session.element, position);
        true
    }

    /// Resolve the session on release of its bound pointer
    pub fn release(&mut self, surface: &dyn Surface, event: &PointerEvent) -> Option<DragReport<I, K>> {
        let pending = self.begin_release(event.pointer_id)?;
        let settled = pending.settle(surface)?;
        Some(self.commit(settled))
    }

    /// Resolve the session as a miss. With `Some(pointer)` only that pointer's
    /// session is cancelled.
    pub fn cancel(&mut self, surface: &dyn Surface, pointer: Option<PointerId>) -> Option<DragReport<I, K>> {
        let pending = self.begin_cancel(pointer)?;
        let settled = pending.settle(surface)?;
        Some(self.commit(settled))
    }

    /// End the session of `pointer` and snapshot what resolving it needs.
    ///
    /// The tracker is idle afterwards. Resolution runs on the snapshot through
    /// [`PendingDrop::settle`] and is recorded with [`DragTracker::commit`], so
    /// target closures may query the tracker's owner while they run.
    pub fn begin_release(&mut self, pointer: PointerId) -> Option<PendingDrop<I, K>> {
        if self.session.as_ref()?.pointer != pointer {
            return None;
        }
        self.begin(false)
    }

    /// Like [`DragTracker::begin_release`], resolving as a miss
    pub fn begin_cancel(&mut self, pointer: Option<PointerId>) -> Option<PendingDrop<I, K>> {
        if let Some(pointer) = pointer {
            if self.session.as_ref()?.pointer != pointer {
                return None;
            }
        }
        self.begin(true)
    }

    fn begin(&mut self, cancelled: bool) -> Option<PendingDrop<I, K>> {
        let session = self.session.take()?;
        let item = match self.draggables.get(&session.element) {
            Some(draggable) => draggable.item.clone(),
            None => {
                debug!(element = ?session.element, "released element is no longer draggable");
                return None;
            }
        };
        Some(PendingDrop {
            session,
            item,
            targets: if cancelled { Vec::new() } else { self.targets.clone() },
            lifted_class: self.lifted_class.clone(),
            epoch: self.epoch,
            cancelled,
        })
    }

    /// Record a settled drop: fill the matched target and disable the
    /// element, or mark a rejected element as returning. Skipped when the
    /// tracker was reset while the drop settled.
    pub fn commit(&mut self, settled: SettledDrop<I, K>) -> DragReport<I, K> {
        let SettledDrop { report, index, epoch } = settled;
        if epoch != self.epoch {
            return report;
        }
        match &report.outcome {
            DropOutcome::Match(_) => {
                if let Some(target) = index.and_then(|i| self.targets.get_mut(i)) {
                    target.fill();
                }
                if let Some(draggable) = self.draggables.get_mut(&report.element) {
                    draggable.enabled = false;
                }
            }
            DropOutcome::Mismatch(_) => {
                self.returning.insert(report.element);
            }
            DropOutcome::Miss => {}
        }
        report
    }

    /// Put a rejected element back at `origin`. Returns false if it is no
    /// longer returning or has been detached meanwhile.
    pub fn complete_return(&mut self, surface: &dyn Surface, element: ElementId, origin: Vec2) -> bool {
        if !self.returning.remove(&element) || !surface.contains(element) {
            return false;
        }
        surface.set_position(element, origin);
        true
    }

    /// Drop every draggable, target and the live session
    pub fn reset(&mut self, surface: &dyn Surface) {
        if let Some(session) = self.clear() {
            surface.release_pointer(session.element, session.pointer);
            if surface.contains(session.element) {
                surface.set_class(session.element, &self.lifted_class, false);
            }
        }
    }

    /// Forget every draggable and target without touching the surface.
    /// Returns the discarded session, if any.
    pub fn clear(&mut self) -> Option<DragSession> {
        self.draggables.clear();
        self.targets.clear();
        self.returning.clear();
        self.epoch += 1;
        self.session.take()
    }
}

/// A released session detached from its tracker, with a snapshot of the
/// targets it resolves against
pub struct PendingDrop<I, K> {
    session: DragSession,
    item: I,
    targets: Vec<DropTarget<I, K>>,
    lifted_class: String,
    epoch: u64,
    cancelled: bool,
}

/// Resolution of a [`PendingDrop`], ready for [`DragTracker::commit`]
pub struct SettledDrop<I, K> {
    report: DragReport<I, K>,
    index: Option<usize>,
    epoch: u64,
}

impl<I: Clone, K: Clone> PendingDrop<I, K> {
    pub fn element(&self) -> ElementId {
        self.session.element
    }

    /// Release the pointer, resolve against the snapshot and move the element
    /// to where it settles. `None` when the element has been detached.
    pub fn settle(self, surface: &dyn Surface) -> Option<SettledDrop<I, K>> {
        let Self {
            session,
            item,
            targets,
            lifted_class,
            epoch,
            cancelled,
        } = self;
        let element = session.element;
        surface.release_pointer(element, session.pointer);
        let Some(bounds) = surface.bounds(element) else {
            debug!(?element, "drag resolved on detached element, discarding");
            return None;
        };
        surface.set_class(element, &lifted_class, false);
        let drop_point = bounds.center();

        let (outcome, index) = if cancelled {
            (DropOutcome::Miss, None)
        } else {
            resolve(drop_point, &item, &targets)
        };

        let resting_position = match (&outcome, index) {
            (DropOutcome::Match(_), Some(index)) => {
                let center = targets[index].bounds().map_or(drop_point, |rect| rect.center());
                let position = center - bounds.size().half();
                surface.set_position(element, position);
                position
            }
            (DropOutcome::Mismatch(_), _) => session.origin,
            _ => {
                surface.set_position(element, session.origin);
                session.origin
            }
        };

        Some(SettledDrop {
            report: DragReport {
                element,
                item,
                outcome,
                origin: session.origin,
                drop_point,
                resting_position,
            },
            index,
            epoch,
        })
    }
}
