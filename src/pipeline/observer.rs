//! Observer boundary to the rendering side

pub use crate::registry::{NodeActivity, NodeAssociation};

/// Receives notifications produced by drain cycles
///
/// Callbacks run on the draining task after the registry write lock has been
/// released, so implementations may read the registry.
pub trait PipelineObserver: Send + Sync {
    /// Once per drain that consumed at least one event, with the last event's timestamp
    fn on_simulation_time_updated(&self, timestamp_ms: f64);

    /// A station was associated or deassociated
    fn on_node_associated(&self, stream: &str, association: NodeAssociation);

    /// A node reported stats; skipped while backpressure suppresses notifications
    fn on_node_activity(&self, _stream: &str, _activity: NodeActivity) {}

    /// Once per drain that consumed at least one event
    fn update_gui(&self, full_refresh: bool);
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {
    fn on_simulation_time_updated(&self, _timestamp_ms: f64) {}

    fn on_node_associated(&self, _stream: &str, _association: NodeAssociation) {}

    fn update_gui(&self, _full_refresh: bool) {}
}
