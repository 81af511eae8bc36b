//! API client for the user-management REST backend.
//!
//! `ApiClient` issues plain requests: no retry happens at this layer.
//! Reads are retried by the resource accessors, mutations never are.

use std::future::Future;
use std::time::Duration;

use reqwest::{header, Client, Method, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};

use crate::models::{ApiResponse, CreateUserRequest, UpdateUserRequest, User, UserStats};

use super::ApiError;

/// Base URL used when the configuration does not name one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

/// HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Operations the backend exposes for users.
///
/// Implemented by `ApiClient` over HTTP; accessors are generic over it so
/// they can be driven by any transport.
pub trait UserApi: Send + Sync {
    fn get_users(&self) -> impl Future<Output = Result<ApiResponse<Vec<User>>, ApiError>> + Send;

    fn get_user(&self, id: i64) -> impl Future<Output = Result<ApiResponse<User>, ApiError>> + Send;

    fn create_user(
        &self,
        data: &CreateUserRequest,
    ) -> impl Future<Output = Result<ApiResponse<User>, ApiError>> + Send;

    fn update_user(
        &self,
        data: &UpdateUserRequest,
    ) -> impl Future<Output = Result<ApiResponse<User>, ApiError>> + Send;

    fn delete_user(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<ApiResponse<()>, ApiError>> + Send;

    fn search_users(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<ApiResponse<Vec<User>>, ApiError>> + Send;

    fn get_user_stats(
        &self,
    ) -> impl Future<Output = Result<ApiResponse<UserStats>, ApiError>> + Send;
}

/// reqwest-backed `UserApi`.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client against `base_url` with the default timeout
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        query: Option<(&str, &str)>,
        body: Option<&B>,
    ) -> Result<Response, ApiError> {
        let url = self.url(path);
        debug!(method = %method, url = %url, "Sending request");

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(pair) = query {
            request = request.query(&[pair]);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let result = match request.send().await {
            Ok(response) => Self::check_response(response).await,
            Err(e) => Err(ApiError::from(e)),
        };
        if let Err(ref e) = result {
            error!(method = %method, url = %url, error = %e, "API request failed");
        }
        result
    }

    async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        query: Option<(&str, &str)>,
        body: Option<&B>,
    ) -> Result<ApiResponse<T>, ApiError> {
        let response = self.send(method, path, query, body).await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        let data = serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("failed to parse JSON from {}: {}", path, e))
        })?;
        Ok(ApiResponse::success(data, status))
    }
}

impl UserApi for ApiClient {
    async fn get_users(&self) -> Result<ApiResponse<Vec<User>>, ApiError> {
        self.request::<_, ()>(Method::GET, "/users", None, None).await
    }

    async fn get_user(&self, id: i64) -> Result<ApiResponse<User>, ApiError> {
        self.request::<_, ()>(Method::GET, &format!("/users/{}", id), None, None)
            .await
    }

    async fn create_user(&self, data: &CreateUserRequest) -> Result<ApiResponse<User>, ApiError> {
        self.request(Method::POST, "/users", None, Some(data)).await
    }

    async fn update_user(&self, data: &UpdateUserRequest) -> Result<ApiResponse<User>, ApiError> {
        self.request(Method::PUT, &format!("/users/{}", data.id), None, Some(data))
            .await
    }

    async fn delete_user(&self, id: i64) -> Result<ApiResponse<()>, ApiError> {
        // Backends answer DELETE with 204 or an arbitrary body; neither is decoded
        let response = self
            .send::<()>(Method::DELETE, &format!("/users/{}", id), None, None)
            .await?;
        Ok(ApiResponse::success((), response.status().as_u16()))
    }

    // `q` is form-encoded, so a space goes out as `+`
    async fn search_users(&self, query: &str) -> Result<ApiResponse<Vec<User>>, ApiError> {
        self.request::<_, ()>(Method::GET, "/users/search", Some(("q", query)), None)
            .await
    }

    async fn get_user_stats(&self) -> Result<ApiResponse<UserStats>, ApiError> {
        self.request::<_, ()>(Method::GET, "/users/stats", None, None)
            .await
    }
}
