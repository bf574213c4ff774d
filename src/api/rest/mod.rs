//! REST API module for HTTP endpoints
//!
//! Read-only views of end-of-cycle registry state, used by clients to
//! recover after a WebSocket reconnect:
//! - `GET /api/streams` - Stream summaries
//! - `GET /api/streams/:stream` - Simulation snapshot with per-metric statistics
//! - `GET /api/streams/:stream/nodes/:id` - Single node with recent history
//! - `GET /api/streams/:stream/metrics/:metric` - Metric across nodes and streams

pub mod metrics;
pub mod nodes;
pub mod streams;

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::Serialize;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Current sequence ID so clients can line the snapshot up with pushed events
    pub sequence_id: u64,
    /// Total count (for list responses)
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

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "BAD_REQUEST".to_string(),
        }
    }

    fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

pub(crate) fn stream_not_found(stream: &str) -> ApiError {
    ApiError::not_found(format!("Stream '{}' not found", stream))
}
