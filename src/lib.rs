//! Simulation Telemetry Pipeline
//!
//! Ingests the per-stream telemetry feed of an 802.11ah (restricted access
//! window) network simulation, keeps derived per-stream state and computes
//! running statistics for live visualization.
//!
//! # Features
//!
//! - **Typed decoding**: one record type per event tag, malformed lines rejected
//! - **Ordered ingestion**: FIFO event queue drained on a periodic tick
//! - **Incremental statistics**: slot usage smoothing, mean/stddev, z-scores
//! - **Backpressure**: deep queues suppress per-node notifications and force drains
//! - **Live updates**: observer notifications pushed over WebSocket
//!
//! # Modules
//!
//! - `types`: Events, simulation model and snapshots
//! - `decoder`: Raw line to typed event
//! - `registry`: Per-stream simulation state
//! - `stats`: Statistics engine
//! - `pipeline`: Queue, backpressure, drain and observer boundary
//! - `api`: HTTP and WebSocket endpoints
//! - `config`, `logging`: Server configuration and tracing setup
//!
//! # Example
//!
//! ```no_run
//! use sim_telemetry::{IngestionPipeline, PipelineConfig, RawEntry};
//!
//! let pipeline = IngestionPipeline::new(PipelineConfig::default());
//! pipeline.receive_one(&RawEntry::new("run-1", "2000000000;apnodeadd;0.0;0.0"));
//! let report = pipeline.tick();
//! println!("applied {} events", report.processed);
//! ```

pub mod api;
pub mod config;
pub mod decoder;
pub mod logging;
pub mod pipeline;
pub mod registry;
pub mod stats;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{ConfigError, ServerConfig};
pub use decoder::{decode_line, DecodeError};
pub use pipeline::{
    BackpressureDecision, DrainReport, IngestionPipeline, PipelineConfig, PipelineObserver,
};
pub use registry::{ApplyError, SimulationRegistry};
pub use types::{
    Event, EventRecord, Metric, Node, NodeValue, RawBatch, RawEntry, Simulation,
    SimulationSnapshot, TelemetryResult,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
