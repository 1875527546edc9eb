//! Mute flag persistence

use tracing::warn;

use crate::error::StorageError;
use crate::host::Storage;

/// Read the persisted mute flag. Missing or malformed values read as unmuted.
pub(crate) fn load_muted(storage: &dyn Storage, key: &str) -> bool {
    let Some(raw) = storage.get(key) else {
        return false;
    };
    match serde_json::from_str::<bool>(&raw) {
        Ok(muted) => muted,
        Err(err) => {
            warn!(key, value = %raw, error = %err, "ignoring malformed mute flag");
            false
        }
    }
}

/// Write the mute flag as a JSON boolean
pub(crate) fn save_muted(storage: &dyn Storage, key: &str, muted: bool) -> Result<(), StorageError> {
    let value = serde_json::to_string(&muted)?;
    storage.set(key, &value)
}
