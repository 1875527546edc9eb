//! Error types for the Playroom core
//!
//! Only construction failures and lookups are errors. Double releases,
//! callbacks firing after teardown and drags resolving on detached elements
//! are defined no-ops and never surface here.

use thiserror::Error;

/// Errors raised by an activity while building its presentation
#[derive(Debug, Error)]
pub enum ActivityError {
    /// The activity could not build its elements
    #[error("failed to build activity `{id}`: {reason}")]
    Build {
        /// Activity identifier
        id: String,
        /// Human-readable cause
        reason: String,
    },

    /// The surface reported a size the activity cannot lay out in
    #[error("surface too small for `{id}`: {width}x{height}")]
    SurfaceTooSmall {
        /// Activity identifier
        id: String,
        /// Surface width
        width: f32,
        /// Surface height
        height: f32,
    },
}

impl ActivityError {
    /// Shorthand for [`ActivityError::Build`]
    pub fn build(id: &str, reason: impl Into<String>) -> Self {
        ActivityError::Build {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors reported by the orchestrator
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// No activity is registered under this identifier
    #[error("activity `{0}` is not registered")]
    NotFound(String),

    /// An activity with this identifier is already registered
    #[error("activity `{0}` is already registered")]
    DuplicateId(String),

    /// The activity failed while mounting; the shell went back to the menu
    #[error("activity `{id}` failed to mount")]
    MountFailed {
        /// Activity identifier
        id: String,
        /// Underlying construction failure
        #[source]
        source: ActivityError,
    },
}

/// Errors raised by persistent storage
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage is not available in this environment
    #[error("storage unavailable")]
    Unavailable,

    /// A write was rejected (quota, privacy mode)
    #[error("failed to write `{key}`: {reason}")]
    Write {
        /// Storage key
        key: String,
        /// Human-readable cause
        reason: String,
    },

    /// Value could not be encoded
    #[error(transparent)]
    Encode(#[from] serde_json::Error),
}

/// Errors raised while reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration JSON is malformed
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range
    #[error("invalid configuration value for `{field}`: {reason}")]
    Invalid {
        /// Field name
        field: &'static str,
        /// Human-readable cause
        reason: String,
    },
}
