//! API response types
//!
//! Wire shapes shared by every endpoint. Success bodies carry
//! `status: "success"` plus endpoint-specific fields; failures carry a single
//! free-text `detail`.

use serde::Serialize;

/// Value of the `status` field on every successful response
pub const STATUS_SUCCESS: &str = "success";

/// Failure body: `{"detail": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Body of `GET /`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
