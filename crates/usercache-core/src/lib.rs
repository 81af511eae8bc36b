//! Client-side data access for a user-management backend.
//!
//! Wraps the REST API with an in-memory TTL cache, exponential-backoff
//! retry for reads, cache invalidation on writes, and sequential batch
//! operations with progress reporting.
//!
//! ```no_run
//! use usercache_core::{ApiClient, DataLayer};
//!
//! # async fn demo() -> Result<(), usercache_core::ApiError> {
//! let layer = DataLayer::new(ApiClient::new("http://localhost:3000/api")?);
//! let users = layer.users();
//! let list = users.fetch_users(false).await?;
//! println!("{} users", list.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod layer;
pub mod models;
pub mod resources;
pub mod retry;
pub mod state;

pub use api::{ApiClient, ApiError, UserApi};
pub use cache::{CacheKey, CacheStore, SharedCache};
pub use config::Config;
pub use layer::{DataLayer, Settings};
pub use resources::{BatchOperations, BatchResult, BatchStatus, UserDetail, Users};
pub use retry::{retry, RetryPolicy};
pub use state::{RequestState, StateCell};
