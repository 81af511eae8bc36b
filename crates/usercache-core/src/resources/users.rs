use tokio::sync::watch;
use tracing::debug;

use crate::api::{ApiError, UserApi};
use crate::cache::CacheKey;
use crate::layer::DataLayer;
use crate::models::{CreateUserRequest, UpdateUserRequest, User, UserStats};
use crate::state::{RequestState, StateCell};

use super::{fetch_cached, load};

/// User list, stats and single-user mutations.
pub struct Users<A> {
    layer: DataLayer<A>,
    users: StateCell<Vec<User>>,
    stats: StateCell<UserStats>,
}

impl<A: UserApi> Users<A> {
    pub(crate) fn new(layer: DataLayer<A>) -> Self {
        Self {
            layer,
            users: StateCell::new(),
            stats: StateCell::new(),
        }
    }

    pub fn users(&self) -> RequestState<Vec<User>> {
        self.users.snapshot()
    }

    pub fn subscribe_users(&self) -> watch::Receiver<RequestState<Vec<User>>> {
        self.users.subscribe()
    }

    pub fn stats(&self) -> RequestState<UserStats> {
        self.stats.snapshot()
    }

    pub fn subscribe_stats(&self) -> watch::Receiver<RequestState<UserStats>> {
        self.stats.subscribe()
    }

    pub fn has_data(&self) -> bool {
        self.users.has_data()
    }

    pub fn has_error(&self) -> bool {
        self.users.has_error()
    }

    pub fn is_loading(&self) -> bool {
        self.users.is_loading()
    }

    pub fn last_updated(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.users.last_updated()
    }

    pub async fn fetch_users(&self, force_refresh: bool) -> Result<Vec<User>, ApiError> {
        let api: &A = &self.layer.api;
        fetch_cached(
            &self.layer,
            &self.users,
            CacheKey::Users,
            self.layer.settings.default_ttl,
            force_refresh,
            move || api.get_users(),
        )
        .await
    }

    pub async fn fetch_stats(&self, force_refresh: bool) -> Result<UserStats, ApiError> {
        let api: &A = &self.layer.api;
        fetch_cached(
            &self.layer,
            &self.stats,
            CacheKey::UserStats,
            self.layer.settings.stats_ttl,
            force_refresh,
            move || api.get_user_stats(),
        )
        .await
    }

    /// Search results replace the list state but are never cached.
    pub async fn search_users(&self, query: &str) -> Result<Vec<User>, ApiError> {
        let api: &A = &self.layer.api;
        load(&self.layer, &self.users, move || api.search_users(query)).await
    }

    pub async fn create_user(&self, data: &CreateUserRequest) -> Result<User, ApiError> {
        let response = self.layer.api.create_user(data).await?;
        debug!(id = response.data.id, "Created user");
        self.layer.cache.invalidate([CacheKey::Users, CacheKey::UserStats]);
        Ok(response.data)
    }

    pub async fn update_user(&self, data: &UpdateUserRequest) -> Result<User, ApiError> {
        let response = self.layer.api.update_user(data).await?;
        debug!(id = data.id, "Updated user");
        self.layer
            .cache
            .invalidate([CacheKey::Users, CacheKey::UserStats, CacheKey::User(data.id)]);
        Ok(response.data)
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        self.layer.api.delete_user(id).await?;
        debug!(id, "Deleted user");
        self.layer
            .cache
            .invalidate([CacheKey::Users, CacheKey::UserStats, CacheKey::User(id)]);
        Ok(())
    }
}
