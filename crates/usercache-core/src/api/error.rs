use reqwest::StatusCode;
use thiserror::Error;

/// Failure of one call to the user backend.
///
/// Every variant is retried alike by the read path; the split only makes
/// messages recorded in `RequestState::error` and batch results readable.
#[derive(Error, Debug)]
pub enum ApiError {
    /// 401 from the backend
    #[error("Not signed in to the user service")]
    Unauthorized,

    /// 403: the caller may not see or change this user
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 404: no such user or route
    #[error("Not found: {0}")]
    NotFound(String),

    /// 429
    #[error("Too many requests to the user service")]
    RateLimited,

    /// Any 5xx
    #[error("Server error (status {status}): {body}")]
    Server { status: u16, body: String },

    /// Any other non-2xx status
    #[error("HTTP error (status {status}): {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Connection, timeout or TLS failure before a status was received
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// 2xx whose body is not the JSON the route promises
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Bodies quoted in error messages are cut to this many bytes
const MAX_ERROR_BODY_LENGTH: usize = 500;

fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}

impl ApiError {
    /// Classify a non-success response.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let body = truncate_body(body);
        let status = status.as_u16();
        match status {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden(body),
            404 => ApiError::NotFound(body),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::Server { status, body },
            _ => ApiError::UnexpectedStatus { status, body },
        }
    }

    /// HTTP status behind this error, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Forbidden(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::RateLimited => Some(429),
            ApiError::Server { status, .. } | ApiError::UnexpectedStatus { status, .. } => {
                Some(*status)
            }
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            ApiError::InvalidResponse(_) => None,
        }
    }
}
