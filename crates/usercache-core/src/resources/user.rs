use tokio::sync::watch;
use tracing::debug;

use crate::api::{ApiError, UserApi};
use crate::cache::CacheKey;
use crate::layer::DataLayer;
use crate::models::{UpdateUserRequest, User};
use crate::state::{RequestState, StateCell};

use super::fetch_cached;

/// State and operations for a single user.
pub struct UserDetail<A> {
    layer: DataLayer<A>,
    id: i64,
    user: StateCell<User>,
}

impl<A: UserApi> UserDetail<A> {
    pub(crate) fn new(layer: DataLayer<A>, id: i64) -> Self {
        Self {
            layer,
            id,
            user: StateCell::new(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn user(&self) -> RequestState<User> {
        self.user.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<RequestState<User>> {
        self.user.subscribe()
    }

    pub fn has_data(&self) -> bool {
        self.user.has_data()
    }

    pub fn has_error(&self) -> bool {
        self.user.has_error()
    }

    pub fn is_loading(&self) -> bool {
        self.user.is_loading()
    }

    pub async fn fetch_user(&self, force_refresh: bool) -> Result<User, ApiError> {
        let api: &A = &self.layer.api;
        let id = self.id;
        fetch_cached(
            &self.layer,
            &self.user,
            CacheKey::User(id),
            self.layer.settings.default_ttl,
            force_refresh,
            move || api.get_user(id),
        )
        .await
    }

    /// Update and keep the fresh value: the state and this user's cache
    /// entry are overwritten, only the list and stats are invalidated.
    pub async fn update_user(&self, data: &UpdateUserRequest) -> Result<User, ApiError> {
        let response = self.layer.api.update_user(data).await?;
        let user = response.data;
        debug!(id = self.id, "Updated user, refreshing cached copy");

        self.user.update(|s| s.set_data(user.clone()));
        self.layer.cache.set(
            &CacheKey::User(self.id).to_string(),
            &user,
            Some(self.layer.settings.default_ttl),
        );
        self.layer.cache.invalidate([CacheKey::Users, CacheKey::UserStats]);

        Ok(user)
    }
}
