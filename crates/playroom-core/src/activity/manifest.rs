//! Activity manifest

use serde::Serialize;

/// Display metadata of an activity, shown by the menu
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActivityManifest {
    /// Stable identifier used by the orchestrator
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Menu icon (emoji)
    pub icon: &'static str,
}

impl ActivityManifest {
    pub const fn new(id: &'static str, name: &'static str, icon: &'static str) -> Self {
        Self { id, name, icon }
    }
}
