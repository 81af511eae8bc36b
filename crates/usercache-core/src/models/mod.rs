//! Data models for the user-management backend.
//!
//! - `User`, `UserStatus`: the user entity as returned by the API
//! - `CreateUserRequest`, `UpdateUserRequest`: mutation payloads
//! - `UserStats`: aggregate counts from `/users/stats`
//! - `ApiResponse`: envelope every `UserApi` call returns

pub mod response;
pub mod user;

pub use response::ApiResponse;
pub use user::{CreateUserRequest, UpdateUserRequest, User, UserStats, UserStatus};
