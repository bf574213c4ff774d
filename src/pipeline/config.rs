//! Pipeline tuning

use std::time::Duration;

use super::backpressure::{DEFAULT_FORCE_DRAIN_THRESHOLD, DEFAULT_SUPPRESS_THRESHOLD};
use crate::registry::DEFAULT_HISTORY_LIMIT;
use crate::stats::SMOOTHING_FACTOR;

/// Tunables of the ingestion pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Weight of the previous value in slot usage smoothing
    pub smoothing_factor: f64,

    /// Queue depth above which node activity notifications are suppressed
    pub suppress_threshold: usize,

    /// Queue depth above which a batch receipt drains immediately
    pub force_drain_threshold: usize,

    /// Snapshots kept per node and slot samples kept per simulation
    pub history_limit: usize,

    /// Cadence of the periodic drain
    pub tick_interval: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            smoothing_factor: SMOOTHING_FACTOR,
            suppress_threshold: DEFAULT_SUPPRESS_THRESHOLD,
            force_drain_threshold: DEFAULT_FORCE_DRAIN_THRESHOLD,
            history_limit: DEFAULT_HISTORY_LIMIT,
            tick_interval: Duration::from_millis(25),
        }
    }
}
