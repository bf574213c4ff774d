//! Simulation Registry
//!
//! Keyed store of per-stream [`Simulation`] state. The registry is only
//! mutated through [`SimulationRegistry::apply`], called by the pipeline
//! while it holds the registry write lock for a drain cycle.

mod apply;

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::stats::SMOOTHING_FACTOR;
use crate::types::{Event, EventRecord, Simulation, SimulationSnapshot, StreamSummary};

/// Default number of snapshots and slot samples kept per node / simulation
pub const DEFAULT_HISTORY_LIMIT: usize = 4096;

/// Errors raised while applying a decoded event
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApplyError {
    #[error("stream '{stream}' has no simulation yet, dropping '{tag}' event")]
    UnknownStream { stream: String, tag: String },
}

/// A (de)association that was applied to a station
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeAssociation {
    pub node_id: usize,
    pub x: f64,
    pub y: f64,
    pub associated: bool,
}

/// A stats update that was applied to a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeActivity {
    pub node_id: usize,
    pub x: f64,
    pub y: f64,
    /// The node's total transmit time grew since its previous snapshot
    pub transmitted: bool,
}

/// Observable outcome of applying one event
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    /// State changed (or the event was a no-op) with nothing to report
    Quiet,
    Association(NodeAssociation),
    Activity(NodeActivity),
}

/// Store of simulations keyed by stream, in order of first `start`
#[derive(Debug, Clone)]
pub struct SimulationRegistry {
    pub(crate) simulations: HashMap<String, Simulation>,
    pub(crate) order: Vec<String>,
    pub(crate) history_limit: usize,
    pub(crate) smoothing_factor: f64,
}

impl Default for SimulationRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl SimulationRegistry {
    pub fn new(history_limit: usize) -> Self {
        Self {
            simulations: HashMap::new(),
            order: Vec::new(),
            history_limit: history_limit.max(1),
            smoothing_factor: SMOOTHING_FACTOR,
        }
    }

    /// Override the smoothing factor applied to slot usage
    pub fn with_smoothing_factor(mut self, alpha: f64) -> Self {
        self.smoothing_factor = alpha;
        self
    }

    /// Apply one event; the only way registry state changes
    pub fn apply(&mut self, event: &Event) -> Result<Applied, ApplyError> {
        if let EventRecord::Start(config) = &event.record {
            apply::start(self, &event.stream, event.timestamp_ms, config);
            return Ok(Applied::Quiet);
        }

        let history_limit = self.history_limit;
        let alpha = self.smoothing_factor;
        let Some(sim) = self.simulations.get_mut(&event.stream) else {
            return match &event.record {
                // unknown tags never touch state
                EventRecord::Unrecognized { .. } => Ok(Applied::Quiet),
                record => Err(ApplyError::UnknownStream {
                    stream: event.stream.clone(),
                    tag: record.tag_name().to_string(),
                }),
            };
        };

        sim.current_time = event.timestamp_ms;
        let applied = match &event.record {
            EventRecord::Start(_) => Applied::Quiet,
            EventRecord::StationAdded(added) => {
                apply::station_added(sim, &event.stream, added);
                Applied::Quiet
            }
            EventRecord::AccessPointAdded(added) => {
                apply::access_point_added(sim, added);
                Applied::Quiet
            }
            EventRecord::StationAssociated(assoc) => apply::station_associated(sim, assoc)
                .map_or(Applied::Quiet, Applied::Association),
            EventRecord::StationDeassociated { id } => {
                apply::station_deassociated(sim, *id).map_or(Applied::Quiet, Applied::Association)
            }
            EventRecord::NodeStats(stats) => apply::node_stats(sim, stats, history_limit)
                .map_or(Applied::Quiet, Applied::Activity),
            EventRecord::SlotStats { kind, values } => {
                apply::slot_stats(
                    sim,
                    *kind,
                    values,
                    event.timestamp_ms,
                    history_limit,
                    alpha,
                );
                Applied::Quiet
            }
            EventRecord::Unrecognized { tag } => {
                tracing::trace!(stream = %event.stream, tag = %tag, "ignoring unrecognized event");
                Applied::Quiet
            }
        };
        Ok(applied)
    }

    pub fn get(&self, stream: &str) -> Option<&Simulation> {
        self.simulations.get(stream)
    }

    pub fn contains(&self, stream: &str) -> bool {
        self.simulations.contains_key(stream)
    }

    /// Stream keys in order of their first `start` event
    pub fn streams(&self) -> &[String] {
        &self.order
    }

    /// Simulations in stream order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Simulation)> {
        self.order
            .iter()
            .filter_map(|key| self.simulations.get(key).map(|sim| (key.as_str(), sim)))
    }

    pub fn simulations(&self) -> impl Iterator<Item = &Simulation> {
        self.iter().map(|(_, sim)| sim)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    pub fn snapshot(&self, stream: &str) -> Option<SimulationSnapshot> {
        self.get(stream)
            .map(|sim| SimulationSnapshot::capture(stream, sim))
    }

    pub fn summaries(&self) -> Vec<StreamSummary> {
        self.iter()
            .map(|(stream, sim)| StreamSummary::capture(stream, sim))
            .collect()
    }
}
