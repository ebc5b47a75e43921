//! REST API module for HTTP endpoints
//!
//! Read access for clients that reconnect or poll:
//! - `GET /api/graph` - View snapshot under the current session selector
//! - `GET /api/graph/stats` - Counters
//! - `GET /api/nodes/:id` - Single node, unfiltered
//! - `GET /api/sessions` - All session records
//! - `GET /api/sessions/:id` - One session record
//! - `GET /api/global` - Global info record
//! - `DELETE /api/graph` - Queue a full clear

pub mod graph;
pub mod sessions;

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::Serialize;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Current sequence ID of the view stream
    pub sequence_id: u64,
    /// Total count for list responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T, sequence_id: u64) -> Self {
        Self {
            data,
            sequence_id,
            total: None,
        }
    }

    pub fn with_total(data: T, sequence_id: u64, total: usize) -> Self {
        Self {
            data,
            sequence_id,
            total: Some(total),
        }
    }
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "NOT_FOUND".to_string(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "UNAVAILABLE".to_string(),
        }
    }

    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}
