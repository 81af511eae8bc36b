//! The data layer: one API handle, one cache, one set of tunables, shared
//! by every accessor created from it.

use std::sync::Arc;
use std::time::Duration;

use crate::api::UserApi;
use crate::cache::{SharedCache, DEFAULT_TTL, STATS_TTL};
use crate::resources::{BatchOperations, UserDetail, Users};
use crate::retry::RetryPolicy;

/// Pause between items of a batch operation.
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// TTL for the user list and single users
    pub default_ttl: Duration,
    pub stats_ttl: Duration,
    /// Applied to reads only
    pub retry: RetryPolicy,
    pub batch_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_ttl: DEFAULT_TTL,
            stats_ttl: STATS_TTL,
            retry: RetryPolicy::default(),
            batch_delay: DEFAULT_BATCH_DELAY,
        }
    }
}

/// Entry point for the UI side.
///
/// Created once at application start. Clone is cheap: clones share the API
/// handle and the cache.
pub struct DataLayer<A> {
    pub(crate) api: Arc<A>,
    pub(crate) cache: SharedCache,
    pub(crate) settings: Settings,
}

impl<A> Clone for DataLayer<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            cache: self.cache.clone(),
            settings: self.settings,
        }
    }
}

impl<A: UserApi> DataLayer<A> {
    pub fn new(api: A) -> Self {
        Self::with_settings(api, Settings::default())
    }

    pub fn with_settings(api: A, settings: Settings) -> Self {
        Self {
            api: Arc::new(api),
            cache: SharedCache::new(),
            settings,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Cache manager shared by all accessors.
    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// User list and stats accessor.
    pub fn users(&self) -> Users<A> {
        Users::new(self.clone())
    }

    /// Accessor for one user.
    pub fn user(&self, id: i64) -> UserDetail<A> {
        UserDetail::new(self.clone(), id)
    }

    pub fn batch(&self) -> BatchOperations<A> {
        BatchOperations::new(self.clone())
    }
}
