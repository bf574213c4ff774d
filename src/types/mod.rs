//! Data types for the telemetry pipeline
//!
//! This module contains the decoded event records, the per-stream
//! simulation model and the immutable snapshots handed to observers.

mod config;
mod event;
mod metric;
mod node;
mod simulation;
mod snapshot;

pub use config::SimulationConfig;
pub use event::{
    AccessPointAdded, Event, EventRecord, EventTag, RawBatch, RawEntry, SlotUsageKind,
    StationAdded, StationAssociated,
};
pub use metric::Metric;
pub use node::{DropReason, DropReasons, Node, NodeKind, NodeStatsRecord, NodeValue};
pub use simulation::Simulation;
pub use snapshot::{NodeSnapshot, SimulationSnapshot, StreamSummary};

/// Result type for server-level operations
pub type TelemetryResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Value a simulator reports for a counter that does not apply to a node
pub const NOT_APPLICABLE: f64 = -1.0;
