//! In-memory TTL cache for API responses.
//!
//! `CacheStore` is the plain map of keyed JSON payloads with per-entry TTL.
//! `SharedCache` wraps one store behind a mutex so every accessor created
//! from the same data layer reads and invalidates the same entries. Nothing
//! here is persisted; the cache lives as long as the data layer does.

pub mod keys;
pub mod shared;
pub mod store;

pub use keys::CacheKey;
pub use shared::SharedCache;
pub use store::{CacheEntry, CacheStore, DEFAULT_TTL, STATS_TTL};
