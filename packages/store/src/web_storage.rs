//! # Browser `localStorage` key/value store
//!
//! [`WebStorageKv`] is the [`KeyValueStore`] used on the **web platform**.
//! Values go into `window.localStorage` under a configurable prefix, which
//! survives reloads and is scoped to the page origin.
//!
//! ## Error handling
//!
//! `localStorage` can be missing (privacy modes, sandboxed frames) or throw
//! on write (quota). Both surface as [`StoreError::Unavailable`]; callers
//! treat the session as unsaved and keep going.

use web_sys::Storage;

use crate::error::StoreError;
use crate::local::KeyValueStore;

/// `localStorage`-backed KeyValueStore.
#[derive(Clone, Debug, Default)]
pub struct WebStorageKv {
    prefix: String,
}

impl WebStorageKv {
    /// Store keys as-is.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store keys as `"<prefix>:<key>"`.
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: format!("{prefix}:"),
        }
    }

    fn storage(&self) -> Result<Storage, StoreError> {
        let window = web_sys::window()
            .ok_or_else(|| StoreError::Unavailable("no window".to_string()))?;
        window
            .local_storage()
            .ok()
            .flatten()
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".to_string()))
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }
}

impl KeyValueStore for WebStorageKv {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage()?
            .get_item(&self.full_key(key))
            .map_err(|e| StoreError::Unavailable(format!("localStorage read failed: {e:?}")))
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?
            .set_item(&self.full_key(key), value)
            .map_err(|e| StoreError::Unavailable(format!("localStorage write failed: {e:?}")))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.storage()?
            .remove_item(&self.full_key(key))
            .map_err(|e| StoreError::Unavailable(format!("localStorage remove failed: {e:?}")))
    }
}
