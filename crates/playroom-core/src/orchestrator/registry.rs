//! Activity registry

use crate::activity::{Activity, ActivityManifest};
use crate::error::OrchestratorError;

/// Activities keyed by identifier, in registration order
#[derive(Default)]
pub struct ActivityRegistry {
    activities: Vec<Box<dyn Activity>>,
}

impl ActivityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an activity; identifiers must be unique
    pub fn insert(&mut self, activity: Box<dyn Activity>) -> Result<(), OrchestratorError> {
        let id = activity.id();
        if self.position(id).is_some() {
            return Err(OrchestratorError::DuplicateId(id.to_string()));
        }
        self.activities.push(activity);
        Ok(())
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.activities.iter().position(|a| a.id() == id)
    }

    pub fn get(&self, id: &str) -> Option<&dyn Activity> {
        self.activities.iter().find(|a| a.id() == id).map(|a| a.as_ref())
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut (dyn Activity + 'static)> {
        self.activities
            .iter_mut()
            .find(|a| a.id() == id)
            .map(|a| a.as_mut())
    }

    /// Manifests in registration order
    pub fn manifests(&self) -> Vec<&'static ActivityManifest> {
        self.activities.iter().map(|a| a.manifest()).collect()
    }

    /// Number of activities currently mounted
    pub fn mounted_count(&self) -> usize {
        self.activities.iter().filter(|a| a.is_mounted()).count()
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}
