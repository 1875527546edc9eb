//! Runtime configuration
//!
//! Every field has a default, so an empty JSON object (or no configuration
//! at all) yields a working setup.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayroomConfig {
    /// Storage key for the persisted mute flag
    pub storage_key: String,
    /// Drag-and-drop behavior
    pub drag: DragConfig,
}

/// Drag-and-drop timings and presentation hooks
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Delay before a rejected element travels back to where it was picked up
    pub mismatch_return_ms: u32,
    /// Class applied to an element while it is being dragged
    pub lifted_class: String,
}

impl PlayroomConfig {
    /// Default storage key for the mute flag
    pub const DEFAULT_STORAGE_KEY: &'static str = "playroom.muted";

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot check
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "storage_key",
                reason: "must not be empty".to_string(),
            });
        }
        self.drag.validate()
    }
}

impl Default for PlayroomConfig {
    fn default() -> Self {
        Self {
            storage_key: Self::DEFAULT_STORAGE_KEY.to_string(),
            drag: DragConfig::default(),
        }
    }
}

impl DragConfig {
    /// Default mismatch return delay (ms)
    pub const DEFAULT_MISMATCH_RETURN_MS: u32 = 500;

    /// Copy of this configuration with a different mismatch delay
    pub fn with_mismatch_return(&self, mismatch_return_ms: u32) -> Self {
        Self {
            mismatch_return_ms,
            ..self.clone()
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.lifted_class.is_empty() || self.lifted_class.contains(char::is_whitespace) {
            return Err(ConfigError::Invalid {
                field: "drag.lifted_class",
                reason: format!("`{}` is not a single class name", self.lifted_class),
            });
        }
        Ok(())
    }
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            mismatch_return_ms: Self::DEFAULT_MISMATCH_RETURN_MS,
            lifted_class: "lifted".to_string(),
        }
    }
}
