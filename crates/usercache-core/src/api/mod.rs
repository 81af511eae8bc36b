//! HTTP boundary to the user-management REST backend.
//!
//! `UserApi` is the seam the resource accessors are written against;
//! `ApiClient` is the reqwest-backed implementation used in production.
//! Every call returns an `ApiResponse` envelope or an `ApiError`.

pub mod client;
pub mod error;

pub use client::{ApiClient, UserApi};
pub use error::ApiError;
