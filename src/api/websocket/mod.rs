//! WebSocket module for telemetry ingestion and live notifications
//!
//! Provides the `/ws` endpoint. Clients push telemetry lines and receive the
//! pipeline's observer notifications, each tagged with a sequence ID for gap
//! detection.

pub mod broadcaster;
pub mod events;
pub mod handler;
pub mod state;

pub use broadcaster::EventBroadcaster;
pub use state::AppState;
