//! Drop resolution

use serde::Serialize;

use super::DropTarget;
use crate::math::Vec2;

/// Result of releasing a dragged item
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum DropOutcome<K> {
    /// Dropped on a target that accepts the item
    Match(K),
    /// Dropped on a target that rejects the item
    Mismatch(K),
    /// Not dropped on any target
    Miss,
}

impl<K> DropOutcome<K> {
    pub fn is_match(&self) -> bool {
        matches!(self, DropOutcome::Match(_))
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, DropOutcome::Mismatch(_))
    }

    pub fn is_miss(&self) -> bool {
        matches!(self, DropOutcome::Miss)
    }

    /// Key of the target that decided the outcome
    pub fn target(&self) -> Option<&K> {
        match self {
            DropOutcome::Match(key) | DropOutcome::Mismatch(key) => Some(key),
            DropOutcome::Miss => None,
        }
    }
}

/// Resolve a drop at `point`.
///
/// Targets are checked in registration order and the first one containing
/// the point decides, whether or not it accepts the item. Filled targets are
/// skipped. Returns the outcome and the index of the deciding target.
pub fn resolve<I, K: Clone>(
    point: Vec2,
    item: &I,
    targets: &[DropTarget<I, K>],
) -> (DropOutcome<K>, Option<usize>) {
    let hit = targets
        .iter()
        .enumerate()
        .find(|(_, target)| !target.is_filled() && target.contains(point));

    match hit {
        Some((index, target)) if target.accepts(item) => {
            (DropOutcome::Match(target.key().clone()), Some(index))
        }
        Some((index, target)) => (DropOutcome::Mismatch(target.key().clone()), Some(index)),
        None => (DropOutcome::Miss, None),
    }
}
