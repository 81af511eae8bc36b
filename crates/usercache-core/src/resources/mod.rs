//! Resource accessors.
//!
//! Each accessor pairs observable `RequestState`s with operations that go
//! through the shared cache and the retry policy:
//!
//! - `Users`: user list, stats, search and single-user mutations
//! - `UserDetail`: one user by id
//! - `BatchOperations`: sequential bulk delete / status change with progress
//!
//! Reads are cache-first and retried. Mutations hit the API once and then
//! invalidate the keys they affect.

pub mod batch;
pub mod user;
pub mod users;

#[cfg(test)]
pub(crate) mod mock;

use std::future::Future;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

pub use batch::{BatchOperations, BatchResult, BatchStatus};
pub use user::UserDetail;
pub use users::Users;

use crate::api::{ApiError, UserApi};
use crate::cache::CacheKey;
use crate::layer::DataLayer;
use crate::models::ApiResponse;
use crate::state::{RequestState, StateCell};

/// Cache-first read shared by every accessor.
///
/// A live entry for `key` is served without a loading phase. Otherwise the
/// retried request runs and its result lands in both `cell` and the cache.
pub(crate) async fn fetch_cached<A, T, F, Fut>(
    layer: &DataLayer<A>,
    cell: &StateCell<T>,
    key: CacheKey,
    ttl: Duration,
    force_refresh: bool,
    request: F,
) -> Result<T, ApiError>
where
    A: UserApi,
    T: Clone + Serialize + DeserializeOwned,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<ApiResponse<T>, ApiError>>,
{
    let key = key.to_string();

    if !force_refresh {
        if let Some(cached) = layer.cache.get::<T>(&key) {
            debug!(cache = %key, "Serving from cache");
            cell.update(|s| s.set_data(cached.clone()));
            return Ok(cached);
        }
    }

    load(layer, cell, request)
        .await
        .inspect(|data| layer.cache.set(&key, data, Some(ttl)))
}

/// Retried request driving `cell` through loading, without touching the cache.
pub(crate) async fn load<A, T, F, Fut>(
    layer: &DataLayer<A>,
    cell: &StateCell<T>,
    request: F,
) -> Result<T, ApiError>
where
    A: UserApi,
    T: Clone,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<ApiResponse<T>, ApiError>>,
{
    cell.update(RequestState::begin_loading);

    match layer.settings.retry.run(request).await {
        Ok(response) => {
            let data = response.data;
            cell.update(|s| s.succeed(data.clone()));
            Ok(data)
        }
        Err(e) => {
            cell.update(|s| s.fail(e.to_string()));
            Err(e)
        }
    }
}
