//! # Local device storage
//!
//! A tiny key/value layer for state that lives on the device rather than in
//! the document store: the session record, plus the saved collections
//! behind [`crate::DeviceStore`].
//!
//! [`KeyValueStore`] is the raw string interface implemented per platform
//! ([`crate::MemoryKv`], [`crate::FileKv`], and `WebStorageKv` in the
//! browser). [`LocalStorage`] wraps any of them with JSON encoding. Reads
//! are typed, so date fields come back as `chrono` dates rather than the
//! strings they are stored as.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;

/// Synchronous string key/value storage.
pub trait KeyValueStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// JSON-encoded values on top of a [`KeyValueStore`].
#[derive(Clone, Debug)]
pub struct LocalStorage<K: KeyValueStore> {
    kv: K,
}

impl<K: KeyValueStore> LocalStorage<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    /// Read `key`, or `default` if it is absent, unreadable, or malformed.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.get(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                tracing::warn!("Discarding stored value for {key}: {e}");
                default
            }
        }
    }

    /// Read and decode `key`. `Ok(None)` when nothing is stored.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.kv.get_raw(key)? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.kv.set_raw(key, &raw)
    }

    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.kv.remove(key)
    }
}
