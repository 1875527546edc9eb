//! `localStorage` persistence

use gloo::storage::{LocalStorage, Storage as _};
use playroom_core::error::StorageError;
use playroom_core::Storage;
use serde_json::Value;
use tracing::warn;

/// [`Storage`] over the browser's `localStorage`
#[derive(Debug)]
pub struct WebStorage {
    _private: (),
}

impl WebStorage {
    /// Open `localStorage`; fails in sandboxed frames and some private modes
    pub fn open() -> Result<Self, StorageError> {
        let available = web_sys::window()
            .and_then(|window| window.local_storage().ok().flatten())
            .is_some();
        if !available {
            return Err(StorageError::Unavailable);
        }
        Ok(Self { _private: () })
    }
}

impl Storage for WebStorage {
    fn get(&self, key: &str) -> Option<String> {
        match LocalStorage::get::<Value>(key) {
            Ok(value) => Some(value.to_string()),
            Err(gloo::storage::errors::StorageError::KeyNotFound(_)) => None,
            Err(err) => {
                warn!(key, %err, "unreadable stored value");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let parsed: Value = serde_json::from_str(value).map_err(|e| StorageError::Write {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        LocalStorage::set(key, parsed).map_err(|e| StorageError::Write {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }
}
