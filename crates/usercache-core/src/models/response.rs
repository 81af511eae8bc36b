use serde::{Deserialize, Serialize};

/// Message attached to every successful response.
pub const SUCCESS_MESSAGE: &str = "Success";

/// Envelope around a decoded response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: u16,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, status: u16) -> Self {
        Self {
            data,
            status,
            message: SUCCESS_MESSAGE.to_string(),
        }
    }
}
