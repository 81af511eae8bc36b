use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{CacheKey, CacheStore};

/// Handle to one `CacheStore` shared by every accessor of a data layer.
/// Clone is cheap and all clones see the same entries.
///
/// The lock is only taken inside these methods and never across an await.
#[derive(Debug, Clone, Default)]
pub struct SharedCache {
    inner: Arc<Mutex<CacheStore>>,
}

impl SharedCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheStore> {
        // A panic while holding the lock cannot leave the map half-written
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Live entry for `key` decoded as `T`.
    ///
    /// An entry that no longer decodes as `T` is reported as a miss.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get_value(key)?;
        match serde_json::from_value(value) {
            Ok(data) => Some(data),
            Err(e) => {
                debug!(
                    cache = key,
                    error = %e,
                    "Cached entry has unexpected shape, treating as miss"
                );
                None
            }
        }
    }

    pub fn get_value(&self, key: &str) -> Option<Value> {
        let value = self.lock().get(key);
        debug!(cache = key, hit = value.is_some(), "Cache lookup");
        value
    }

    /// Store `data` under `key`; `None` uses the default TTL.
    pub fn set<T: Serialize>(&self, key: &str, data: &T, ttl: Option<Duration>) {
        match serde_json::to_value(data) {
            Ok(value) => self.set_value(key, value, ttl),
            Err(e) => debug!(cache = key, error = %e, "Failed to serialize value for cache"),
        }
    }

    pub fn set_value(&self, key: &str, value: Value, ttl: Option<Duration>) {
        self.lock().set(key, value, ttl);
    }

    pub fn delete(&self, key: &str) -> bool {
        self.lock().delete(key)
    }

    /// Delete every listed key in one critical section.
    pub fn invalidate(&self, keys: impl IntoIterator<Item = CacheKey>) {
        let mut store = self.lock();
        for key in keys {
            let key = key.to_string();
            if store.delete(&key) {
                debug!(cache = %key, "Invalidated cache entry");
            }
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.lock().has(key)
    }

    pub fn size(&self) -> usize {
        self.lock().size()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn clear_expired(&self) -> usize {
        self.lock().clear_expired()
    }

    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        self.lock().ttl_remaining(key)
    }
}
