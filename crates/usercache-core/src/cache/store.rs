use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;

/// Default lifetime of a cache entry.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Lifetime of the user stats entry; counts drift faster than the list.
pub const STATS_TTL: Duration = Duration::from_secs(2 * 60);

#[derive(Debug, Clone)]
pub struct CacheEntry {
    value: Value,
    inserted_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    pub fn new(value: Value, ttl: Duration) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
            ttl,
        }
    }

    /// An entry is live while `now - inserted_at < ttl`.
    pub fn is_expired(&self) -> bool {
        self.inserted_at.elapsed() >= self.ttl
    }

    pub fn ttl_remaining(&self) -> Duration {
        self.ttl.saturating_sub(self.inserted_at.elapsed())
    }
}

/// Keyed JSON payloads with lazy TTL expiry.
///
/// Expired entries are only dropped by a scan: every `get` scans the whole
/// map first, `clear_expired` scans on demand. `has` and `size` report what
/// is physically stored.
#[derive(Debug, Default)]
pub struct CacheStore {
    entries: HashMap<String, CacheEntry>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, key: &str) -> Option<Value> {
        self.clear_expired();
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone())
    }

    /// Insert or overwrite; `None` uses `DEFAULT_TTL`.
    pub fn set(&mut self, key: impl Into<String>, value: Value, ttl: Option<Duration>) {
        let entry = CacheEntry::new(value, ttl.unwrap_or(DEFAULT_TTL));
        self.entries.insert(key.into(), entry);
    }

    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Drop every expired entry, returning how many went.
    pub fn clear_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        before - self.entries.len()
    }

    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(CacheEntry::ttl_remaining)
    }
}
