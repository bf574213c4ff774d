//! API module for HTTP and WebSocket endpoints
//!
//! This module provides the ingestion WebSocket, live observer notifications
//! and read-only REST views of the registry.

pub mod http;
pub mod rest;
pub mod websocket;

pub use http::create_router;
pub use websocket::AppState;
